use std::time::Duration;

use badgedesk_domain::MarkerGlyphs;

use super::classification::{SessionFailureKind, ToggleFailure};

/// Default deadline for one toggle request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings shared by every control driven by one controller.
#[derive(Debug, Clone)]
pub struct ToggleControllerConfig {
    /// Deadline after which a pending toggle is resolved as failed.
    pub request_timeout: Duration,
    /// User-facing failure messages.
    pub messages: NotificationMessages,
    /// Phrases used to classify HTML responses.
    pub html_markers: HtmlMarkerPhrases,
    /// Rendered content for each marker.
    pub glyphs: MarkerGlyphs,
}

impl Default for ToggleControllerConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            messages: NotificationMessages::default(),
            html_markers: HtmlMarkerPhrases::default(),
            glyphs: MarkerGlyphs::default(),
        }
    }
}

/// Message table for failed toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessages {
    /// Fallback for transport errors and unclassified responses.
    pub generic: String,
    /// Shown when the user lacks permission for the field.
    pub permission_denied: String,
    /// Shown when the user account has been disabled.
    pub account_disabled: String,
    /// Shown when the session expired and a new login is needed.
    pub session_expired: String,
    /// Shown when the server did not answer before the deadline.
    pub timed_out: String,
}

impl NotificationMessages {
    /// Returns the message surfaced for a failure.
    ///
    /// Server-provided messages are used verbatim.
    #[must_use]
    pub fn message_for(&self, failure: &ToggleFailure) -> String {
        match failure {
            ToggleFailure::ServerRejected {
                message: Some(message),
                ..
            } => message.clone(),
            ToggleFailure::SessionOrAuth { kind, .. } => match kind {
                SessionFailureKind::PermissionDenied => self.permission_denied.clone(),
                SessionFailureKind::AccountDisabled => self.account_disabled.clone(),
                SessionFailureKind::SessionExpired => self.session_expired.clone(),
            },
            ToggleFailure::TimedOut { .. } => self.timed_out.clone(),
            ToggleFailure::Transport { .. }
            | ToggleFailure::ServerRejected { message: None, .. }
            | ToggleFailure::UnclassifiedHtml { .. }
            | ToggleFailure::MalformedResponse { .. } => self.generic.clone(),
        }
    }
}

impl Default for NotificationMessages {
    fn default() -> Self {
        Self {
            generic: "Si è verificato un errore durante l'aggiornamento. Riprova più tardi."
                .to_owned(),
            permission_denied: "Non hai i permessi per modificare questo campo.".to_owned(),
            account_disabled: "Il suo account è stato disabilitato.".to_owned(),
            session_expired: "Sessione scaduta. Effettua di nuovo l'accesso.".to_owned(),
            timed_out: "Il server non ha risposto in tempo. Riprova più tardi.".to_owned(),
        }
    }
}

/// Phrases recognized in HTML bodies returned instead of JSON.
///
/// Lists are checked in field order and matched case-insensitively. Account
/// markers come before session markers because a disabled account is
/// reported on the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlMarkerPhrases {
    /// Markers of a permission-denied page.
    pub permission_denied: Vec<String>,
    /// Markers of a disabled or removed account.
    pub account_disabled: Vec<String>,
    /// Markers of an expired session or a login page.
    pub session_expired: Vec<String>,
}

impl HtmlMarkerPhrases {
    /// Classifies an HTML body, if any marker phrase occurs in it.
    #[must_use]
    pub fn classify(&self, body: &str) -> Option<SessionFailureKind> {
        let body = body.to_lowercase();
        let contains_any = |phrases: &[String]| {
            phrases
                .iter()
                .filter(|phrase| !phrase.trim().is_empty())
                .any(|phrase| body.contains(phrase.to_lowercase().as_str()))
        };

        if contains_any(&self.permission_denied) {
            Some(SessionFailureKind::PermissionDenied)
        } else if contains_any(&self.account_disabled) {
            Some(SessionFailureKind::AccountDisabled)
        } else if contains_any(&self.session_expired) {
            Some(SessionFailureKind::SessionExpired)
        } else {
            None
        }
    }
}

impl Default for HtmlMarkerPhrases {
    fn default() -> Self {
        fn phrases(values: &[&str]) -> Vec<String> {
            values.iter().map(|value| (*value).to_owned()).collect()
        }

        Self {
            permission_denied: phrases(&[
                "Non hai i permessi",
                "insufficient authorization",
                "permission denied",
            ]),
            account_disabled: phrases(&[
                "account è stato disabilitato",
                "account è stato rimosso",
                "account disabled",
            ]),
            session_expired: phrases(&[
                "Sessione scaduta",
                "session expired",
                "action=\"/login\"",
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{HtmlMarkerPhrases, NotificationMessages};
    use crate::toggle_service::classification::{SessionFailureKind, ToggleFailure};

    #[test]
    fn disabled_account_on_login_page_is_not_reported_as_expired_session() {
        let body = r#"<form action="/login" method="post">
            <p class="flash">Il suo account è stato disabilitato.</p>
        </form>"#;

        assert_eq!(
            HtmlMarkerPhrases::default().classify(body),
            Some(SessionFailureKind::AccountDisabled)
        );
    }

    #[test]
    fn phrases_match_case_insensitively() {
        assert_eq!(
            HtmlMarkerPhrases::default().classify("<h1>SESSIONE SCADUTA</h1>"),
            Some(SessionFailureKind::SessionExpired)
        );
        assert_eq!(HtmlMarkerPhrases::default().classify("<h1>Oops</h1>"), None);
    }

    #[test]
    fn blank_phrases_are_skipped() {
        let markers = HtmlMarkerPhrases {
            permission_denied: vec![String::new()],
            ..HtmlMarkerPhrases::default()
        };
        assert_eq!(markers.classify("<p>anything</p>"), None);
    }

    #[test]
    fn server_message_is_used_verbatim() {
        let messages = NotificationMessages::default();
        let failure = ToggleFailure::ServerRejected {
            status: 404,
            message: Some("Dipendente non trovato".to_owned()),
        };
        assert_eq!(messages.message_for(&failure), "Dipendente non trovato");
    }
}
