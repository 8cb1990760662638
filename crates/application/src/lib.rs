//! Application services and ports.

#![forbid(unsafe_code)]

mod toggle_ports;
mod toggle_service;

pub use toggle_ports::{GatewayResponse, ToggleGateway, ToggleNotifier, ToggleRequest, ToggleView};
pub use toggle_service::{
    HtmlMarkerPhrases, NotificationMessages, ResponseClassification, SessionFailureKind,
    ToggleController, ToggleControllerConfig, ToggleFailure, ToggleHandle, ToggleOutcome,
    classify_response,
};
