//! Shared application state.

use confeitaria_db::{Database, OrderWorkflow};

/// State handed to every handler.
///
/// Cheap to clone: the database is a pool handle.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub workflow: OrderWorkflow,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState {
            workflow: OrderWorkflow::new(db.clone()),
            db,
        }
    }
}
