use badgedesk_application::ToggleView;
use badgedesk_domain::{Marker, MarkerGlyphs};

/// Toggle view that keeps its rendered content in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InMemoryToggleView {
    content: String,
    enabled: bool,
}

impl InMemoryToggleView {
    /// Creates an enabled view showing `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            enabled: true,
        }
    }

    /// Creates an enabled view showing the marker for `value`.
    #[must_use]
    pub fn showing(glyphs: &MarkerGlyphs, value: bool) -> Self {
        Self::new(glyphs.render(Marker::for_value(value)))
    }
}

impl ToggleView for InMemoryToggleView {
    fn content(&self) -> String {
        self.content.clone()
    }

    fn set_content(&mut self, content: &str) {
        content.clone_into(&mut self.content);
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
