// Domain layer - Request-scoped value objects and pure composition logic
pub mod dashboard;
pub mod error;
pub mod patient;
pub mod plot;
pub mod series;
pub mod styling;
pub mod summary;
