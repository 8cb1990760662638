//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_toggle_notifier;
mod http_toggle_gateway;
mod in_memory_toggle_view;

pub use console_toggle_notifier::ConsoleToggleNotifier;
pub use http_toggle_gateway::{DEFAULT_TOGGLE_PATH, HttpToggleGateway};
pub use in_memory_toggle_view::InMemoryToggleView;
