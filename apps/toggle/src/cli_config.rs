use std::env;
use std::time::Duration;

use badgedesk_core::{AppError, AppResult};
use badgedesk_domain::{COMPANY_TOGGLE_FIELDS, EMPLOYEE_TOGGLE_FIELDS, FieldCatalog};
use badgedesk_infrastructure::DEFAULT_TOGGLE_PATH;

#[derive(Debug, Clone)]
pub struct ToggleCliConfig {
    pub base_url: String,
    pub toggle_path: String,
    pub request_timeout: Duration,
    pub session_cookie: Option<String>,
    pub catalog: FieldCatalog,
}

impl ToggleCliConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from a variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let base_url = lookup("BADGEDESK_BASE_URL")
            .unwrap_or_else(|| "http://127.0.0.1:5000".to_owned())
            .trim_end_matches('/')
            .to_owned();
        let toggle_path =
            lookup("BADGEDESK_TOGGLE_PATH").unwrap_or_else(|| DEFAULT_TOGGLE_PATH.to_owned());
        let timeout_ms = parse_env_u64(&lookup, "BADGEDESK_TIMEOUT_MS", 10_000)?;
        let session_cookie = optional_non_empty_env(&lookup, "BADGEDESK_SESSION_COOKIE");

        if timeout_ms == 0 {
            return Err(AppError::Validation(
                "BADGEDESK_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        let employee_fields =
            parse_env_list(&lookup, "BADGEDESK_EMPLOYEE_FIELDS", EMPLOYEE_TOGGLE_FIELDS);
        let company_fields =
            parse_env_list(&lookup, "BADGEDESK_COMPANY_FIELDS", COMPANY_TOGGLE_FIELDS);
        let catalog = FieldCatalog::new(employee_fields, company_fields)?;

        Ok(Self {
            base_url,
            toggle_path,
            request_timeout: Duration::from_millis(timeout_ms),
            session_cookie,
            catalog,
        })
    }
}

fn optional_non_empty_env(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_env_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: u64,
) -> AppResult<u64> {
    match lookup(name) {
        Some(value) => value.parse::<u64>().map_err(|error| {
            AppError::Validation(format!("invalid {name} value '{value}': {error}"))
        }),
        None => Ok(default),
    }
}

fn parse_env_list(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: &[&str],
) -> Vec<String> {
    match optional_non_empty_env(lookup, name) {
        Some(value) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_owned)
            .collect(),
        None => default.iter().map(|item| (*item).to_owned()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use badgedesk_core::AppResult;
    use badgedesk_domain::EntityType;
    use badgedesk_infrastructure::DEFAULT_TOGGLE_PATH;

    use super::ToggleCliConfig;

    fn load_with(vars: &[(&str, &str)]) -> AppResult<ToggleCliConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ToggleCliConfig::from_lookup(|name| vars.get(name).cloned())
    }

    fn loaded(vars: &[(&str, &str)]) -> ToggleCliConfig {
        match load_with(vars) {
            Ok(config) => config,
            Err(error) => panic!("configuration should load: {error}"),
        }
    }

    #[test]
    fn defaults_apply_without_variables() {
        let config = loaded(&[]);

        assert_eq!(config.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.toggle_path, DEFAULT_TOGGLE_PATH);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.session_cookie, None);
        assert_eq!(
            config.catalog.resolve("badgeSuspended").ok(),
            Some(EntityType::Employee)
        );
    }

    #[test]
    fn base_url_drops_trailing_slashes() {
        let config = loaded(&[("BADGEDESK_BASE_URL", "https://admin.example.test//")]);
        assert_eq!(config.base_url, "https://admin.example.test");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(load_with(&[("BADGEDESK_TIMEOUT_MS", "0")]).is_err());
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        assert!(load_with(&[("BADGEDESK_TIMEOUT_MS", "10s")]).is_err());
    }

    #[test]
    fn blank_session_cookie_is_ignored() {
        let config = loaded(&[
            ("BADGEDESK_SESSION_COOKIE", "   "),
            ("BADGEDESK_TIMEOUT_MS", "2500"),
        ]);

        assert_eq!(config.session_cookie, None);
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn field_lists_are_comma_separated_and_trimmed() {
        let config = loaded(&[
            ("BADGEDESK_EMPLOYEE_FIELDS", " badge , ,access,"),
            ("BADGEDESK_COMPANY_FIELDS", "accessBlocked"),
        ]);

        let employee: Vec<&str> = config.catalog.fields_for(EntityType::Employee).collect();
        let company: Vec<&str> = config.catalog.fields_for(EntityType::Company).collect();
        assert_eq!(employee, vec!["access", "badge"]);
        assert_eq!(company, vec!["accessBlocked"]);
        assert!(config.catalog.resolve("badgeSuspended").is_err());
    }

    #[test]
    fn overlapping_field_lists_are_rejected() {
        let config = load_with(&[
            ("BADGEDESK_EMPLOYEE_FIELDS", "badge"),
            ("BADGEDESK_COMPANY_FIELDS", "badge,accessBlocked"),
        ]);
        assert!(config.is_err());
    }
}
