use std::sync::Arc;

use crate::config::AppConfig;

/// Shared application state passed to every handler.
///
/// Cheaply cloneable: the pool is reference-counted and the config sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(pool: yamdb_db::DbPool, config: AppConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Open the pool described by `config` and apply pending migrations.
    pub async fn connect(config: AppConfig) -> Result<Self, sqlx::Error> {
        let pool = yamdb_db::create_pool(&config.database_url, config.db_max_connections).await?;
        yamdb_db::run_migrations(&pool).await?;
        Ok(Self::new(pool, config))
    }
}
