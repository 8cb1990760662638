use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use badgedesk_domain::{Marker, MarkerGlyphs, ToggleState};
use tokio::sync::Mutex;

use crate::toggle_ports::ToggleView;

struct ControlSlot {
    state: ToggleState,
    view: Box<dyn ToggleView>,
}

impl ControlSlot {
    fn restore(&mut self, snapshot: ViewSnapshot) {
        self.state.roll_back();
        self.view.set_content(snapshot.content.as_str());
        self.view.set_enabled(snapshot.enabled);
    }
}

/// Rendered content and input state captured before an optimistic update.
struct ViewSnapshot {
    content: String,
    enabled: bool,
}

/// An accepted optimistic update waiting for the server.
///
/// Dropping it without calling [`PendingToggle::confirm`] or
/// [`PendingToggle::roll_back`] restores the snapshot, so a cancelled
/// invocation never leaves the control pending.
pub(super) struct PendingToggle {
    slot: Arc<Mutex<ControlSlot>>,
    snapshot: Option<ViewSnapshot>,
}

impl PendingToggle {
    pub(super) async fn confirm(mut self, value: bool, glyphs: &MarkerGlyphs) {
        let mut slot = self.slot.lock().await;
        self.snapshot = None;
        slot.state.confirm(value);

        let marker = slot.state.marker();
        slot.view.set_content(glyphs.render(marker));
        slot.view.set_enabled(true);
    }

    pub(super) async fn roll_back(mut self) {
        let mut slot = self.slot.lock().await;
        if let Some(snapshot) = self.snapshot.take() {
            slot.restore(snapshot);
        }
    }
}

impl Drop for PendingToggle {
    fn drop(&mut self) {
        let Some(snapshot) = self.snapshot.take() else {
            return;
        };

        if let Ok(mut slot) = self.slot.try_lock() {
            slot.restore(snapshot);
            return;
        }

        // Another task holds the lock only for a synchronous transition.
        let slot = Arc::clone(&self.slot);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                slot.lock().await.restore(snapshot);
            });
        }
    }
}

/// Shareable handle to one bound toggle control.
///
/// Clones refer to the same control, so clicks delivered through any clone
/// share the pending guard.
#[derive(Clone)]
pub struct ToggleHandle {
    slot: Arc<Mutex<ControlSlot>>,
}

impl ToggleHandle {
    pub(super) fn bind(view: Box<dyn ToggleView>, glyphs: &MarkerGlyphs) -> Self {
        let state = ToggleState::new(glyphs.infer(view.content().as_str()));

        Self {
            slot: Arc::new(Mutex::new(ControlSlot { state, view })),
        }
    }

    /// Returns the current toggle state.
    pub async fn state(&self) -> ToggleState {
        self.slot.lock().await.state
    }

    /// Returns the content currently rendered by the view.
    pub async fn content(&self) -> String {
        self.slot.lock().await.view.content()
    }

    /// Returns whether the view accepts input.
    pub async fn is_enabled(&self) -> bool {
        self.slot.lock().await.view.is_enabled()
    }

    /// Starts an optimistic update.
    ///
    /// Returns the desired value and the guard that resolves the update, or
    /// `None` when the control is pending or does not accept input.
    pub(super) async fn begin(&self, glyphs: &MarkerGlyphs) -> Option<(bool, PendingToggle)> {
        let mut slot = self.slot.lock().await;
        if !slot.view.is_enabled() {
            return None;
        }

        let snapshot = ViewSnapshot {
            content: slot.view.content(),
            enabled: slot.view.is_enabled(),
        };
        let desired_value = slot.state.begin()?;

        slot.view.set_content(glyphs.render(Marker::InProgress));
        slot.view.set_enabled(false);

        let pending = PendingToggle {
            slot: Arc::clone(&self.slot),
            snapshot: Some(snapshot),
        };
        Some((desired_value, pending))
    }
}

impl Debug for ToggleHandle {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("ToggleHandle").finish_non_exhaustive()
    }
}
