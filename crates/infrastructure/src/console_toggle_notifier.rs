//! Console notifier for command-line use. Writes notices to tracing output.

use async_trait::async_trait;
use badgedesk_application::ToggleNotifier;
use badgedesk_core::AppResult;
use tracing::warn;

/// Notifier that reports failed toggles on the console.
#[derive(Clone)]
pub struct ConsoleToggleNotifier;

impl ConsoleToggleNotifier {
    /// Creates a new console notifier.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleToggleNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToggleNotifier for ConsoleToggleNotifier {
    async fn notify(&self, message: &str) -> AppResult<()> {
        warn!(notice = message, "--- NOTICE ---\n{}\n--- END NOTICE ---", message);

        Ok(())
    }
}
