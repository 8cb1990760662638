use async_trait::async_trait;
use badgedesk_core::AppResult;
use badgedesk_domain::{EntityId, EntityType, ToggleableField};
use serde::Serialize;

/// JSON body posted to the toggle endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleRequest {
    /// Entity type owning the field.
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    /// Record identifier.
    #[serde(rename = "id")]
    pub entity_id: EntityId,
    /// Field to update.
    #[serde(rename = "field")]
    pub field_name: String,
    /// Desired new value, `1` for set and `0` for cleared.
    pub clicked: u8,
}

impl ToggleRequest {
    /// Builds the request that moves a field to `desired_value`.
    #[must_use]
    pub fn new(field: &ToggleableField, desired_value: bool) -> Self {
        Self {
            entity_type: field.entity_type(),
            entity_id: field.entity_id().clone(),
            field_name: field.field_name().to_owned(),
            clicked: u8::from(desired_value),
        }
    }
}

/// Raw response returned by the toggle endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header value, when present.
    pub content_type: Option<String>,
    /// Response body decoded as text.
    pub body: String,
}

impl GatewayResponse {
    /// Returns whether the status code is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns whether the body is declared as JSON.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.content_type.as_deref().is_some_and(|content_type| {
            let media_type = content_type
                .split(';')
                .next()
                .unwrap_or_default()
                .trim()
                .to_ascii_lowercase();
            media_type == "application/json" || media_type.ends_with("+json")
        })
    }
}

/// Port for the remote toggle endpoint.
#[async_trait]
pub trait ToggleGateway: Send + Sync {
    /// Sends one toggle request.
    ///
    /// Any HTTP response, including error statuses, is returned as `Ok`.
    /// `Err` means no response was received.
    async fn send_toggle(&self, request: &ToggleRequest) -> AppResult<GatewayResponse>;
}
