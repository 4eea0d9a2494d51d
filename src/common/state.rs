use std::sync::Arc;

use crate::config::Config;
use crate::store::ReadingStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ReadingStore,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: ReadingStore, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
