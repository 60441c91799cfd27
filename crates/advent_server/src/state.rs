use std::sync::Arc;

use advent_core::db::open_store;
use advent_core::{AppConfig, Clock, SystemClock};
use rusqlite::Connection;

use super::error::ApiError;

/// Shared, immutable request context.
pub struct AppState {
    pub config: AppConfig,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Arc<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// State with a pinned or otherwise custom source of "today".
    pub fn with_clock<C>(config: AppConfig, clock: C) -> Arc<Self>
    where
        C: Clock + Send + Sync + 'static,
    {
        Arc::new(Self {
            config,
            clock: Arc::new(clock),
        })
    }

    pub fn clock(&self) -> Arc<dyn Clock + Send + Sync> {
        Arc::clone(&self.clock)
    }

    /// Runs `task` on a blocking worker with a freshly opened store connection.
    ///
    /// The connection is dropped when `task` returns. With a `:memory:`
    /// database every call therefore sees an empty store.
    pub async fn with_connection<T, F>(&self, task: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let database = self.config.database.clone();
        tokio::task::spawn_blocking(move || {
            let conn = open_store(&database)?;
            task(&conn)
        })
        .await?
    }
}
