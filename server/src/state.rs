use std::sync::Arc;

use crate::store::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
}

impl AppState {
    pub fn new(store: impl EventStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}
