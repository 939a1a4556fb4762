use std::sync::Arc;

use crate::services::TicketService;

/// Shared handles injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub tickets: Arc<TicketService>,
}

impl AppState {
    pub fn new(tickets: TicketService) -> Self {
        Self {
            tickets: Arc::new(tickets),
        }
    }
}
