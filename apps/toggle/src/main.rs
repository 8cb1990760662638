//! Badgedesk toggle client.
//!
//! Flips one boolean field of an employee or company record through the
//! administrative server's toggle endpoint.

#![forbid(unsafe_code)]

mod cli_config;

use std::sync::Arc;

use badgedesk_application::{ToggleController, ToggleControllerConfig, ToggleOutcome};
use badgedesk_core::{AppError, AppResult};
use badgedesk_domain::{EntityId, EntityType};
use badgedesk_infrastructure::{ConsoleToggleNotifier, HttpToggleGateway, InMemoryToggleView};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli_config::ToggleCliConfig;

/// Toggle one boolean field of an employee or company record.
#[derive(Debug, Parser)]
#[command(name = "badgedesk-toggle", version)]
struct ToggleArgs {
    /// Record identifier.
    #[arg(long)]
    id: String,
    /// Field to toggle, e.g. `badge` or `accessBlocked`.
    #[arg(long)]
    field: String,
    /// Entity type owning the field (`employee` or `company`); derived from
    /// the field when omitted.
    #[arg(long)]
    entity_type: Option<EntityType>,
    /// The control currently shows the confirmed marker.
    #[arg(long)]
    confirmed: bool,
    /// Send the identifier as a JSON number.
    #[arg(long)]
    numeric_id: bool,
}

impl ToggleArgs {
    fn entity_id(&self) -> AppResult<EntityId> {
        if self.numeric_id {
            return self.id.trim().parse::<i64>().map(EntityId::number).map_err(|error| {
                AppError::Validation(format!("invalid numeric id '{}': {error}", self.id))
            });
        }

        EntityId::text(self.id.as_str())
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = ToggleArgs::parse();
    let config = ToggleCliConfig::load()?;
    let entity_id = args.entity_id()?;

    let http_client = reqwest::Client::builder()
        .connect_timeout(config.request_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;
    let mut gateway = HttpToggleGateway::new(
        http_client,
        config.base_url.as_str(),
        config.toggle_path.as_str(),
    )?;
    if let Some(cookie) = config.session_cookie.clone() {
        gateway = gateway.with_session_cookie(cookie);
    }

    info!(
        endpoint = %gateway.endpoint(),
        timeout = ?config.request_timeout,
        has_session_cookie = config.session_cookie.is_some(),
        "badgedesk-toggle started"
    );

    let controller_config = ToggleControllerConfig {
        request_timeout: config.request_timeout,
        ..ToggleControllerConfig::default()
    };
    let view = InMemoryToggleView::showing(&controller_config.glyphs, args.confirmed);
    let controller = ToggleController::new(
        Arc::new(gateway),
        Arc::new(ConsoleToggleNotifier::new()),
        config.catalog,
        controller_config,
    );
    let handle = controller.bind(view);

    let outcome = match args.entity_type {
        Some(entity_type) => {
            controller
                .handle_toggle_as(&handle, entity_type, entity_id, args.field.as_str())
                .await?
        }
        None => {
            controller
                .handle_toggle(&handle, entity_id, args.field.as_str())
                .await?
        }
    };
    let marker = handle.content().await;

    match outcome {
        ToggleOutcome::Confirmed { value } => {
            info!(
                field = args.field.as_str(),
                value,
                marker = marker.trim(),
                "field updated"
            );
            Ok(())
        }
        ToggleOutcome::RolledBack { failure, message } => {
            warn!(
                field = args.field.as_str(),
                marker = marker.trim(),
                notice = message.as_str(),
                "field left unchanged"
            );
            Err(AppError::Unavailable(failure.to_string()))
        }
        ToggleOutcome::Ignored => {
            warn!(field = args.field.as_str(), "toggle ignored by control");
            Ok(())
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use badgedesk_domain::{EntityId, EntityType};

    use super::ToggleArgs;

    #[test]
    fn parses_explicit_entity_type() {
        let args = ToggleArgs::try_parse_from([
            "badgedesk-toggle",
            "--id",
            "42",
            "--field",
            "accessBlocked",
            "--entity-type",
            "company",
            "--confirmed",
        ]);

        let args = match args {
            Ok(args) => args,
            Err(error) => panic!("arguments should parse: {error}"),
        };
        assert_eq!(args.entity_type, Some(EntityType::Company));
        assert!(args.confirmed);
        assert!(matches!(args.entity_id(), Ok(EntityId::Text(_))));
    }

    #[test]
    fn rejects_unknown_entity_type() {
        let args = ToggleArgs::try_parse_from([
            "badgedesk-toggle",
            "--id",
            "42",
            "--field",
            "badge",
            "--entity-type",
            "supplier",
        ]);
        assert!(args.is_err());
    }

    #[test]
    fn numeric_id_must_be_an_integer() {
        let parse = |id: &str| {
            ToggleArgs::try_parse_from([
                "badgedesk-toggle",
                "--id",
                id,
                "--field",
                "badge",
                "--numeric-id",
            ])
            .ok()
            .map(|args| args.entity_id().ok())
        };

        assert_eq!(parse("42"), Some(Some(EntityId::number(42))));
        assert_eq!(parse("4x2"), Some(None));
    }
}
