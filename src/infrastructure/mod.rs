// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod json_stream;
pub mod static_registry;
