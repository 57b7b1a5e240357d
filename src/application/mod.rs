// Application layer - Use cases composed from the store and domain logic
pub mod comparison_service;
pub mod dashboard_service;
pub mod patient_service;
pub mod series_store;
pub mod similarity;
pub mod summary_service;
