use serde::{Deserialize, Serialize};

/// Visual marker displayed by a toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// The field is set.
    Confirmed,
    /// The field is not set.
    NotConfirmed,
    /// A request for the field is in flight.
    InProgress,
}

impl Marker {
    /// Returns the resting marker for a boolean value.
    #[must_use]
    pub fn for_value(value: bool) -> Self {
        if value {
            Self::Confirmed
        } else {
            Self::NotConfirmed
        }
    }
}

/// Rendered content for each marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerGlyphs {
    /// Content rendered for [`Marker::Confirmed`].
    pub confirmed: String,
    /// Content rendered for [`Marker::NotConfirmed`].
    pub not_confirmed: String,
    /// Content rendered for [`Marker::InProgress`].
    pub in_progress: String,
}

impl MarkerGlyphs {
    /// Returns the content to render for a marker.
    #[must_use]
    pub fn render(&self, marker: Marker) -> &str {
        match marker {
            Marker::Confirmed => self.confirmed.as_str(),
            Marker::NotConfirmed => self.not_confirmed.as_str(),
            Marker::InProgress => self.in_progress.as_str(),
        }
    }

    /// Infers a boolean from arbitrary rendered content.
    ///
    /// Content is `true` when it contains the trimmed confirmed glyph.
    #[must_use]
    pub fn infer(&self, content: &str) -> bool {
        let glyph = self.confirmed.trim();
        !glyph.is_empty() && content.contains(glyph)
    }
}

impl Default for MarkerGlyphs {
    fn default() -> Self {
        Self {
            confirmed: " ✅ ".to_owned(),
            not_confirmed: " ❌ ".to_owned(),
            in_progress: " ⟳ ".to_owned(),
        }
    }
}

/// Lifecycle phase of a toggle control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TogglePhase {
    /// Showing the last confirmed value and accepting clicks.
    Idle,
    /// Waiting for the server; clicks are ignored.
    Pending,
}

/// Per-control toggle state.
///
/// `current` is the last value confirmed by the server; the rendered marker
/// is a projection of this state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToggleState {
    current: bool,
    pending: bool,
}

impl ToggleState {
    /// Creates an idle state holding a confirmed value.
    #[must_use]
    pub fn new(current: bool) -> Self {
        Self {
            current,
            pending: false,
        }
    }

    /// Returns the last confirmed value.
    #[must_use]
    pub fn current(&self) -> bool {
        self.current
    }

    /// Returns whether a request is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> TogglePhase {
        if self.pending {
            TogglePhase::Pending
        } else {
            TogglePhase::Idle
        }
    }

    /// Returns the marker that represents this state.
    #[must_use]
    pub fn marker(&self) -> Marker {
        if self.pending {
            Marker::InProgress
        } else {
            Marker::for_value(self.current)
        }
    }

    /// Moves `Idle` to `Pending` and returns the desired value.
    ///
    /// Returns `None` when a request is already in flight.
    pub fn begin(&mut self) -> Option<bool> {
        if self.pending {
            return None;
        }

        self.pending = true;
        Some(!self.current)
    }

    /// Resolves `Pending` with a value confirmed by the server.
    pub fn confirm(&mut self, value: bool) {
        self.current = value;
        self.pending = false;
    }

    /// Resolves `Pending` back to `Idle` keeping the prior value.
    pub fn roll_back(&mut self) {
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{Marker, MarkerGlyphs, TogglePhase, ToggleState};

    #[test]
    fn begin_requests_the_negated_value() {
        let mut state = ToggleState::new(false);
        assert_eq!(state.begin(), Some(true));
        assert_eq!(state.phase(), TogglePhase::Pending);
        assert_eq!(state.marker(), Marker::InProgress);
    }

    #[test]
    fn begin_is_refused_while_pending() {
        let mut state = ToggleState::new(true);
        assert_eq!(state.begin(), Some(false));
        assert_eq!(state.begin(), None);
    }

    #[test]
    fn confirm_flips_the_marker() {
        let mut state = ToggleState::new(false);
        let desired = state.begin().unwrap_or_default();
        state.confirm(desired);
        assert_eq!(state.marker(), Marker::Confirmed);
        assert_eq!(state.phase(), TogglePhase::Idle);
    }

    #[test]
    fn glyphs_infer_from_surrounding_markup() {
        let glyphs = MarkerGlyphs::default();
        assert!(glyphs.infer("<span class=\"ok\">✅</span>"));
        assert!(!glyphs.infer(" ❌ "));
        assert!(!glyphs.infer(""));
    }

    #[test]
    fn blank_confirmed_glyph_never_matches() {
        let glyphs = MarkerGlyphs {
            confirmed: "  ".to_owned(),
            ..MarkerGlyphs::default()
        };
        assert!(!glyphs.infer("anything"));
    }

    proptest! {
        #[test]
        fn rollback_restores_the_prior_state(current in any::<bool>()) {
            let before = ToggleState::new(current);
            let mut state = before;
            prop_assert!(state.begin().is_some());
            state.roll_back();
            prop_assert_eq!(state, before);
        }
    }
}
