use std::sync::Arc;

use biogrid_db::PgLayoutGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and gateway are reference counted.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: biogrid_db::DbPool,
    /// Server configuration, including grid metrics used for rendering.
    pub config: Arc<ServerConfig>,
    /// Layout persistence over `pool`.
    pub gateway: Arc<PgLayoutGateway>,
}

impl AppState {
    pub fn new(pool: biogrid_db::DbPool, config: ServerConfig) -> Self {
        let gateway = Arc::new(PgLayoutGateway::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            gateway,
        }
    }
}
