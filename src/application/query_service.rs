// Query service - Live "as of instant" queries
use crate::application::as_of::snapshot_at;
use crate::application::series_store::SeriesStore;
use crate::domain::protocol::{ClientMessage, ServerMessage};
use std::sync::Arc;

/// Stateless; one instance is shared by every connection
#[derive(Clone)]
pub struct QueryService {
    store: Arc<SeriesStore>,
}

impl QueryService {
    pub fn new(store: Arc<SeriesStore>) -> Self {
        Self { store }
    }

    pub fn handle(&self, msg: ClientMessage) -> ServerMessage {
        match msg {
            ClientMessage::InstantData { instant } => ServerMessage::InstantData {
                data: snapshot_at(&self.store, instant),
            },
        }
    }

    /// Handle one text frame. Unknown or malformed messages get no reply.
    pub fn respond(&self, text: &str) -> Option<ServerMessage> {
        match ClientMessage::decode(text) {
            Ok(msg) => Some(self.handle(msg)),
            Err(e) => {
                tracing::warn!("Ignoring client message: {}", e);
                None
            }
        }
    }
}
