use std::sync::Arc;

use crate::config::AppConfig;
use crate::storage::PlayerStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PlayerStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: PlayerStore, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}
