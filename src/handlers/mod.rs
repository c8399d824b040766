pub mod common;
pub mod health;
pub mod transport;

use crate::{db::DbPool, services::TransportService};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub transport: Arc<TransportService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            transport: Arc::new(TransportService::new(db_pool)),
        }
    }
}
