use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        Self { db_pool, config: Arc::new(config) }
    }

    /// State whose pool never connects unless a query runs.
    #[cfg(test)]
    pub fn lazy_for_tests() -> Self {
        let config = Config::for_tests();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        Self::new(pool, config)
    }
}
