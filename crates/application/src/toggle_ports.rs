mod gateway;
mod notifier;
mod view;

pub use gateway::{GatewayResponse, ToggleGateway, ToggleRequest};
pub use notifier::ToggleNotifier;
pub use view::ToggleView;
