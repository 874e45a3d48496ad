// Presentation layer - HTTP surface for the dashboards
pub mod app_state;
pub mod error;
pub mod handlers;
pub mod routes;
