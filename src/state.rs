//! Shared application state for all routes.

use std::sync::Arc;

use crate::config::Config;
use crate::storage::Storage;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: Config) -> Self {
        AppState {
            storage,
            config: Arc::new(config),
        }
    }
}
