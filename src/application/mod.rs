// Application layer - Use cases over the mission series
pub mod as_of;
pub mod dataset_service;
pub mod images;
pub mod query_service;
pub mod series_source;
pub mod series_store;
pub mod travel;
