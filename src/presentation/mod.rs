// Presentation layer - HTTP boundary to the UI host
pub mod app_state;
pub mod handlers;
