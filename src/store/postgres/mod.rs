//! Postgres storage backend.
//!
//! Writes always go to the primary pool. Reads prefer the replica
//! pool (if configured) and fall back to the primary pool whenever
//! the replica is unhealthy.
use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use super::{Error, ReportExt, Result};
use crate::config;

mod error;
mod follows;
mod posts;
mod users;


pub use self::error::SqlxResultExt;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    pub(crate) async fn new(
        global_cfg: &config::Database,
        pool_cfg: &config::DbPoolConfig,
    ) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(global_cfg.timeout_secs.get()))
            .max_connections(pool_cfg.pool_size.get());

        if let Some(min_idle) = pool_cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(&pool_cfg.url).change_context(Error::InvalidUrl)?;

        if global_cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Prefer);
        }

        if pool_cfg.readonly {
            connect_opts = connect_opts.options([("default_transaction_read_only", "on")]);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {
                tracing::warn!("database pool is not healthy yet, connecting lazily");
            }
            Err(err) => return Err(err),
        }

        Ok(pool)
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[must_use]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    /// Takes an idle connection or opens a new one. An empty pool is
    /// not unhealthy by itself since idle connections get reaped.
    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        if let Some(inner) = self.pool.try_acquire() {
            return Ok(inner);
        }

        match self.pool.acquire().await {
            Ok(inner) => Ok(inner),
            Err(e @ (sqlx::Error::PoolTimedOut | sqlx::Error::Io(..))) => {
                Err(Report::new(e).change_context(Error::UnhealthyPool))
            }
            Err(e) => Err(e).into_store_error(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e @ (sqlx::Error::PoolTimedOut | sqlx::Error::Io(..))) => {
                Err(e).change_context(Error::UnhealthyPool)
            }
            Err(e) => Err(Report::new(Error::internal(e))),
        }
    }
}

/// Storage backed by a Postgres primary database and an optional
/// read-only replica.
#[derive(Debug, Clone)]
pub struct PgStore {
    primary: Pool,
    replica: Option<Pool>,
}

impl PgStore {
    #[tracing::instrument(skip_all, name = "db.connect_store")]
    pub async fn connect(cfg: &config::Database) -> Result<Self> {
        let primary = Pool::new(cfg, &cfg.primary).await?;
        let replica = if let Some(replica) = cfg.replica.as_ref() {
            Some(Pool::new(cfg, replica).await?)
        } else {
            None
        };

        Ok(Self { primary, replica })
    }

    /// Applies every pending migration to the primary database.
    #[tracing::instrument(skip(self), name = "db.migrate")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.primary.pool)
            .await
            .map_err(|e| Report::new(Error::internal(e)))?;

        tracing::info!("database migrations applied");
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn db_write(&self) -> Result<PoolConnection> {
        self.primary.get().await
    }

    #[tracing::instrument(skip_all)]
    async fn db_read(&self) -> Result<PoolConnection> {
        if let Some(replica) = self.replica.as_ref() {
            match replica.get().await {
                Ok(conn) => return Ok(conn),
                // fallback
                Err(err) if err.is_unhealthy() => {
                    tracing::warn!("replica pool is unhealthy, reading from primary");
                }
                Err(err) => return Err(err),
            }
        }
        self.primary.get().await
    }
}
