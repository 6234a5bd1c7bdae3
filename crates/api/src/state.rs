use std::sync::Arc;

use greenlight_db::DbPool;

use crate::config::ServerConfig;

/// Handler state. Cloned per request, so everything in it is a handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ServerConfig>,
}
