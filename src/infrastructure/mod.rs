// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_source;
pub mod dataset_client;
pub mod image_resolver;
pub mod query_client;
pub mod retry;
