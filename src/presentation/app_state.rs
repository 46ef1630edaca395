// Application state for HTTP and WebSocket handlers
use crate::application::dataset_service::DatasetService;
use crate::application::query_service::QueryService;

#[derive(Clone)]
pub struct AppState {
    pub dataset_service: DatasetService,
    pub query_service: QueryService,
}
