// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_store;
pub mod csv_table;
pub mod http_response;
pub mod memory_store;
