//! Optimistic toggle controller.
//!
//! A click flips the control to an in-progress marker, posts the desired
//! value, then either renders the confirmed value or restores the exact
//! pre-click content and notifies the user.

mod classification;
mod config;
mod handle;


use std::sync::Arc;

use badgedesk_core::AppResult;
use badgedesk_domain::{EntityId, EntityType, FieldCatalog, ToggleableField};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::toggle_ports::{ToggleGateway, ToggleNotifier, ToggleRequest, ToggleView};

pub use classification::{
    ResponseClassification, SessionFailureKind, ToggleFailure, classify_response,
};
pub use config::{HtmlMarkerPhrases, NotificationMessages, ToggleControllerConfig};
pub use handle::ToggleHandle;

/// Resolution of one toggle invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The control was pending or disabled; nothing was sent.
    Ignored,
    /// The server confirmed the value now rendered by the control.
    Confirmed {
        /// Confirmed field value.
        value: bool,
    },
    /// The control was restored to its pre-click content.
    RolledBack {
        /// Why the toggle failed.
        failure: ToggleFailure,
        /// Message surfaced to the user.
        message: String,
    },
}

/// Application service driving toggle controls against the remote endpoint.
#[derive(Clone)]
pub struct ToggleController {
    gateway: Arc<dyn ToggleGateway>,
    notifier: Arc<dyn ToggleNotifier>,
    catalog: FieldCatalog,
    config: ToggleControllerConfig,
}

impl ToggleController {
    /// Creates a new toggle controller.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn ToggleGateway>,
        notifier: Arc<dyn ToggleNotifier>,
        catalog: FieldCatalog,
        config: ToggleControllerConfig,
    ) -> Self {
        Self {
            gateway,
            notifier,
            catalog,
            config,
        }
    }

    /// Returns the field allow-list.
    #[must_use]
    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    /// Binds a rendered control, inferring its value from the displayed marker.
    pub fn bind(&self, view: impl ToggleView + 'static) -> ToggleHandle {
        ToggleHandle::bind(Box::new(view), &self.config.glyphs)
    }

    /// Handles a click on a control, deriving the entity type from the field.
    ///
    /// Returns `Err` only when the field is not togglable; in that case the
    /// control is untouched and no request is sent.
    pub async fn handle_toggle(
        &self,
        handle: &ToggleHandle,
        entity_id: EntityId,
        field_name: &str,
    ) -> AppResult<ToggleOutcome> {
        let field = self.catalog.field(None, entity_id, field_name)?;
        Ok(self.toggle_field(handle, field).await)
    }

    /// Handles a click on a control bound to an explicit entity type.
    pub async fn handle_toggle_as(
        &self,
        handle: &ToggleHandle,
        entity_type: EntityType,
        entity_id: EntityId,
        field_name: &str,
    ) -> AppResult<ToggleOutcome> {
        let field = self.catalog.field(Some(entity_type), entity_id, field_name)?;
        Ok(self.toggle_field(handle, field).await)
    }

    async fn toggle_field(&self, handle: &ToggleHandle, field: ToggleableField) -> ToggleOutcome {
        let request_id = Uuid::new_v4();
        let Some((desired_value, pending)) = handle.begin(&self.config.glyphs).await else {
            debug!(
                request_id = %request_id,
                entity_type = %field.entity_type(),
                entity_id = %field.entity_id(),
                field = field.field_name(),
                "toggle ignored while control is pending"
            );
            return ToggleOutcome::Ignored;
        };

        let request = ToggleRequest::new(&field, desired_value);
        debug!(
            request_id = %request_id,
            entity_type = %field.entity_type(),
            entity_id = %field.entity_id(),
            field = field.field_name(),
            desired_value,
            "sending toggle request"
        );

        match self.send(&request).await {
            ResponseClassification::Success { new_state } => {
                let value = new_state.unwrap_or(desired_value);
                pending.confirm(value, &self.config.glyphs).await;
                info!(
                    request_id = %request_id,
                    entity_type = %field.entity_type(),
                    entity_id = %field.entity_id(),
                    field = field.field_name(),
                    value,
                    "toggle confirmed"
                );

                ToggleOutcome::Confirmed { value }
            }
            ResponseClassification::Failure(failure) => {
                pending.roll_back().await;
                let message = self.config.messages.message_for(&failure);
                warn!(
                    request_id = %request_id,
                    entity_type = %field.entity_type(),
                    entity_id = %field.entity_id(),
                    field = field.field_name(),
                    error = %failure,
                    "toggle rolled back"
                );

                if let Err(error) = self.notifier.notify(message.as_str()).await {
                    warn!(
                        request_id = %request_id,
                        error = %error,
                        "failed to notify user about rolled back toggle"
                    );
                }

                ToggleOutcome::RolledBack { failure, message }
            }
        }
    }

    async fn send(&self, request: &ToggleRequest) -> ResponseClassification {
        let timeout = self.config.request_timeout;
        match tokio::time::timeout(timeout, self.gateway.send_toggle(request)).await {
            Ok(Ok(response)) => classify_response(&response, &self.config.html_markers),
            Ok(Err(error)) => ResponseClassification::Failure(ToggleFailure::Transport {
                detail: error.to_string(),
            }),
            Err(_) => ResponseClassification::Failure(ToggleFailure::TimedOut {
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}
