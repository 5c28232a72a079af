use std::sync::Arc;

use session_core::SessionDataStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SessionDataStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn SessionDataStore>) -> Self {
        Self { store }
    }
}
