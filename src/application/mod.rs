// Application layer - Use cases over the generated telemetry
pub mod anomaly;
pub mod assistant;
pub mod chat_service;
pub mod classifier;
pub mod dashboard_service;
pub mod entity_registry;
pub mod generator;
pub mod streaming_service;
