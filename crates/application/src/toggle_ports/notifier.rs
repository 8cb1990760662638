use async_trait::async_trait;
use badgedesk_core::AppResult;

/// Port used to surface a failure message to the user.
#[async_trait]
pub trait ToggleNotifier: Send + Sync {
    /// Shows one message and returns once the user has been notified.
    async fn notify(&self, message: &str) -> AppResult<()>;
}
