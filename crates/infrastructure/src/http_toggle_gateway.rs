use async_trait::async_trait;
use badgedesk_application::{GatewayResponse, ToggleGateway, ToggleRequest};
use badgedesk_core::{AppError, AppResult};
use reqwest::header;
use tracing::debug;
use url::Url;


/// Route of the toggle endpoint on the administrative server.
pub const DEFAULT_TOGGLE_PATH: &str = "/checkbox-pressed";

/// HTTP implementation of the toggle endpoint port.
pub struct HttpToggleGateway {
    http_client: reqwest::Client,
    endpoint: Url,
    session_cookie: Option<String>,
}

impl HttpToggleGateway {
    /// Creates a gateway posting to `toggle_path` on `base_url`.
    pub fn new(http_client: reqwest::Client, base_url: &str, toggle_path: &str) -> AppResult<Self> {
        let base_url = Url::parse(base_url).map_err(|error| {
            AppError::Validation(format!("invalid toggle base URL '{base_url}': {error}"))
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "toggle base URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        let endpoint = base_url.join(toggle_path).map_err(|error| {
            AppError::Validation(format!("invalid toggle path '{toggle_path}': {error}"))
        })?;

        Ok(Self {
            http_client,
            endpoint,
            session_cookie: None,
        })
    }

    /// Sends a session cookie with every request, standing in for the
    /// browser's same-origin credentials.
    #[must_use]
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Returns the resolved endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ToggleGateway for HttpToggleGateway {
    async fn send_toggle(&self, request: &ToggleRequest) -> AppResult<GatewayResponse> {
        let mut builder = self
            .http_client
            .post(self.endpoint.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Requested-With", "XMLHttpRequest")
            .json(request);

        if let Some(cookie) = &self.session_cookie {
            builder = builder.header(header::COOKIE, cookie.as_str());
        }

        let response = builder.send().await.map_err(|error| {
            AppError::Unavailable(format!("failed to call toggle endpoint: {error}"))
        })?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(|error| {
            AppError::Unavailable(format!(
                "failed to read toggle endpoint response body: {error}"
            ))
        })?;

        debug!(
            endpoint = %self.endpoint,
            status,
            content_type = content_type.as_deref().unwrap_or("<none>"),
            "toggle endpoint responded"
        );

        Ok(GatewayResponse {
            status,
            content_type,
            body,
        })
    }
}
