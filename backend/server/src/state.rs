use std::sync::Arc;

use sqlx::SqlitePool;

use super::{
    config::Config,
    database::{connect, initialize_finance_schema, initialize_lego_schema},
    error::AppError,
};

pub struct State {
    pub config: Config,
    pub lego_pool: SqlitePool,
    pub finance_pool: SqlitePool,
}

impl State {
    pub async fn new(config: Config) -> Result<Arc<Self>, AppError> {
        let lego_pool = connect(&config.lego_db_path).await?;
        let finance_pool = connect(&config.finance_db_path).await?;

        initialize_lego_schema(&mut *lego_pool.acquire().await?).await?;
        initialize_finance_schema(&mut *finance_pool.acquire().await?).await?;

        Ok(Arc::new(Self {
            config,
            lego_pool,
            finance_pool,
        }))
    }
}
