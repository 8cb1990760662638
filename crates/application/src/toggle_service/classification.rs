use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

use crate::toggle_ports::GatewayResponse;

use super::config::HtmlMarkerPhrases;

/// Session or authorization problem reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionFailureKind {
    /// The user may not modify this field.
    PermissionDenied,
    /// The user account is disabled or removed.
    AccountDisabled,
    /// The session expired and the server answered with its login page.
    SessionExpired,
}

impl SessionFailureKind {
    /// Returns the stable value used in structured error bodies.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission_denied",
            Self::AccountDisabled => "account_disabled",
            Self::SessionExpired => "session_expired",
        }
    }

    fn from_kind(value: &str) -> Option<Self> {
        match value {
            "permission_denied" => Some(Self::PermissionDenied),
            "account_disabled" => Some(Self::AccountDisabled),
            "session_expired" => Some(Self::SessionExpired),
            _ => None,
        }
    }
}

/// Reason a toggle was rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleFailure {
    /// No response was received.
    Transport {
        /// Transport error description.
        detail: String,
    },
    /// The request deadline elapsed.
    TimedOut {
        /// Deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },
    /// The server answered with a JSON error.
    ServerRejected {
        /// HTTP status code.
        status: u16,
        /// Error message from the payload, when present.
        message: Option<String>,
    },
    /// The server reported a session or authorization problem.
    SessionOrAuth {
        /// Problem kind.
        kind: SessionFailureKind,
        /// HTTP status code.
        status: u16,
    },
    /// The server answered with HTML matching no known marker.
    UnclassifiedHtml {
        /// HTTP status code.
        status: u16,
    },
    /// A successful JSON response could not be parsed.
    MalformedResponse {
        /// HTTP status code.
        status: u16,
        /// Parse error description.
        detail: String,
    },
}

impl Display for ToggleFailure {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport { detail } => write!(formatter, "transport error: {detail}"),
            Self::TimedOut { timeout_ms } => {
                write!(formatter, "no response within {timeout_ms} ms")
            }
            Self::ServerRejected {
                status,
                message: Some(message),
            } => write!(formatter, "server rejected toggle with status {status}: {message}"),
            Self::ServerRejected {
                status,
                message: None,
            } => write!(formatter, "server rejected toggle with status {status}"),
            Self::SessionOrAuth { kind, status } => {
                write!(formatter, "{} (status {status})", kind.as_str())
            }
            Self::UnclassifiedHtml { status } => {
                write!(formatter, "unclassified HTML response with status {status}")
            }
            Self::MalformedResponse { status, detail } => {
                write!(formatter, "malformed response with status {status}: {detail}")
            }
        }
    }
}

/// Result of interpreting one endpoint response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseClassification {
    /// The server accepted the toggle.
    Success {
        /// Value reported back by the server, when it included one.
        new_state: Option<bool>,
    },
    /// The toggle must be rolled back.
    Failure(ToggleFailure),
}

/// Interprets a response from the toggle endpoint.
///
/// JSON responses are judged by status code. Anything else is sniffed for
/// the marker phrases the server puts on its login and error pages,
/// whatever the status code.
#[must_use]
pub fn classify_response(
    response: &GatewayResponse,
    html_markers: &HtmlMarkerPhrases,
) -> ResponseClassification {
    if !response.is_json() {
        let failure = match html_markers.classify(response.body.as_str()) {
            Some(kind) => ToggleFailure::SessionOrAuth {
                kind,
                status: response.status,
            },
            None => ToggleFailure::UnclassifiedHtml {
                status: response.status,
            },
        };
        return ResponseClassification::Failure(failure);
    }

    let parsed = response_object(response.body.as_str());

    if response.is_success() {
        return match parsed {
            Ok(body) => ResponseClassification::Success {
                new_state: body.get("newState").and_then(value_as_bool),
            },
            Err(detail) => ResponseClassification::Failure(ToggleFailure::MalformedResponse {
                status: response.status,
                detail,
            }),
        };
    }

    let body = parsed.ok();
    let structured_kind = body
        .as_ref()
        .and_then(|body| body.get("kind"))
        .and_then(Value::as_str)
        .and_then(SessionFailureKind::from_kind);

    if let Some(kind) = structured_kind {
        return ResponseClassification::Failure(ToggleFailure::SessionOrAuth {
            kind,
            status: response.status,
        });
    }

    let message = body
        .as_ref()
        .and_then(|body| body.get("error"))
        .and_then(Value::as_str)
        .filter(|message| !message.trim().is_empty())
        .map(str::to_owned);

    ResponseClassification::Failure(ToggleFailure::ServerRejected {
        status: response.status,
        message,
    })
}

fn response_object(body: &str) -> Result<Map<String, Value>, String> {
    let payload = serde_json::from_str::<Value>(body).map_err(|error| error.to_string())?;
    match payload {
        Value::Object(object) => Ok(object),
        _ => Err("response body must be a JSON object".to_owned()),
    }
}

fn value_as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(value) => Some(*value),
        Value::Number(number) => match number.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{ResponseClassification, SessionFailureKind, ToggleFailure, classify_response};
    use crate::toggle_ports::GatewayResponse;
    use crate::toggle_service::config::HtmlMarkerPhrases;

    fn json(status: u16, body: &str) -> GatewayResponse {
        GatewayResponse {
            status,
            content_type: Some("application/json".to_owned()),
            body: body.to_owned(),
        }
    }

    fn html(status: u16, body: &str) -> GatewayResponse {
        GatewayResponse {
            status,
            content_type: Some("text/html; charset=utf-8".to_owned()),
            body: body.to_owned(),
        }
    }

    fn classify(response: &GatewayResponse) -> ResponseClassification {
        classify_response(response, &HtmlMarkerPhrases::default())
    }

    #[test]
    fn success_reads_server_state() {
        let response = json(
            200,
            r#"{"success": "Stato del badge aggiornato con successo", "newState": 0}"#,
        );
        assert_eq!(
            classify(&response),
            ResponseClassification::Success {
                new_state: Some(false)
            }
        );
    }

    #[test]
    fn success_without_state_leaves_value_to_the_caller() {
        let response = json(200, r#"{"success": true}"#);
        assert_eq!(
            classify(&response),
            ResponseClassification::Success { new_state: None }
        );
    }

    #[test]
    fn unparsable_success_body_is_a_failure() {
        let response = json(200, "not json");
        assert!(matches!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::MalformedResponse { status: 200, .. })
        ));
    }

    #[test]
    fn success_body_must_be_a_json_object() {
        for body in ["[null,null,null]", "true", r#""ok""#] {
            let response = json(200, body);
            assert_eq!(
                classify(&response),
                ResponseClassification::Failure(ToggleFailure::MalformedResponse {
                    status: 200,
                    detail: "response body must be a JSON object".to_owned(),
                })
            );
        }
    }

    #[test]
    fn json_error_message_is_not_trimmed() {
        let response = json(400, r#"{"error": "  Ditta non trovata\n"}"#);
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::ServerRejected {
                status: 400,
                message: Some("  Ditta non trovata\n".to_owned()),
            })
        );
    }

    #[test]
    fn blank_json_error_message_is_dropped() {
        let response = json(400, r#"{"error": "  \n"}"#);
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::ServerRejected {
                status: 400,
                message: None,
            })
        );
    }

    #[test]
    fn json_error_array_body_has_no_message() {
        let response = json(500, r#"[{"error": "boom"}]"#);
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::ServerRejected {
                status: 500,
                message: None,
            })
        );
    }

    #[test]
    fn json_error_keeps_the_server_message() {
        let response = json(400, r#"{"error": "Campo non riconosciuto"}"#);
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::ServerRejected {
                status: 400,
                message: Some("Campo non riconosciuto".to_owned()),
            })
        );
    }

    #[test]
    fn json_error_without_message_has_no_message() {
        let response = json(500, "{}");
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::ServerRejected {
                status: 500,
                message: None,
            })
        );
    }

    #[test]
    fn structured_kind_wins_over_message() {
        let response = json(
            403,
            r#"{"error": "Non hai i permessi per modificare questo campo", "kind": "permission_denied"}"#,
        );
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::SessionOrAuth {
                kind: SessionFailureKind::PermissionDenied,
                status: 403,
            })
        );
    }

    #[test]
    fn html_permission_marker_is_classified_for_any_status() {
        for status in [200, 302, 403, 500] {
            let response = html(status, "<p>Insufficient authorization for this field</p>");
            assert_eq!(
                classify(&response),
                ResponseClassification::Failure(ToggleFailure::SessionOrAuth {
                    kind: SessionFailureKind::PermissionDenied,
                    status,
                })
            );
        }
    }

    #[test]
    fn html_without_markers_is_unclassified() {
        let response = html(502, "<h1>Bad Gateway</h1>");
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::UnclassifiedHtml { status: 502 })
        );
    }

    #[test]
    fn missing_content_type_is_treated_as_html() {
        let response = GatewayResponse {
            status: 200,
            content_type: None,
            body: r#"{"success": true}"#.to_owned(),
        };
        assert_eq!(
            classify(&response),
            ResponseClassification::Failure(ToggleFailure::UnclassifiedHtml { status: 200 })
        );
    }
}
