use std::sync::Arc;

use voxgate_core::{AssistantRepository, SignedUrlBroker};

/// Shared, immutable per-process state handed to every handler.
pub struct ServerState {
    pub assistants: Arc<dyn AssistantRepository>,
    pub broker: Arc<dyn SignedUrlBroker>,
}

impl ServerState {
    pub fn new(
        assistants: Arc<dyn AssistantRepository>,
        broker: Arc<dyn SignedUrlBroker>,
    ) -> Self {
        Self { assistants, broker }
    }
}
