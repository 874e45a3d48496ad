// Domain layer - Entities, metric schema and pure computations
pub mod alert;
pub mod dashboard;
pub mod derived;
pub mod entity;
pub mod metric;
pub mod profile;
pub mod telemetry;
