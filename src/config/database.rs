use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct Database {
    /// Writable primary database.
    #[validate]
    pub primary: DbPoolConfig,
    /// A read-only replica database used for reading data without
    /// putting load on the primary database.
    #[validate]
    pub replica: Option<DbPoolConfig>,
    /// Forces all database connections to be encrypted with TLS
    /// (if possible).
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_ENFORCE_TLS`
    #[serde(default = "DbPoolConfig::default_enforce_tls")]
    pub enforce_tls: bool,
    /// How long the server waits for a connection to be
    /// established or acquired before giving up.
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_TIMEOUT_SECS`
    #[serde(default = "DbPoolConfig::default_pool_timeout_secs")]
    pub timeout_secs: NonZeroU64,
    /// Applies pending migrations to the primary database on startup.
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_RUN_MIGRATIONS`
    #[serde(default = "DbPoolConfig::default_run_migrations")]
    pub run_migrations: bool,
}

/// Configuration for connecting to any Postgres database
#[derive(Deserialize, Validate)]
pub struct DbPoolConfig {
    /// Database pool must be in read-only mode.
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_PRIMARY_READONLY`
    /// - `MURMUR_DB_REPLICA_READONLY`
    #[serde(default)]
    pub readonly: bool,
    /// Minimum idle database connections.
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_PRIMARY_MIN_IDLE`
    /// - `MURMUR_DB_REPLICA_MIN_IDLE`
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of connections the pool can hold.
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_PRIMARY_POOL_SIZE`
    /// - `MURMUR_DB_REPLICA_POOL_SIZE`
    #[serde(default = "DbPoolConfig::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Connection URL of the Postgres database.
    ///
    /// **Environment variables**:
    /// - `MURMUR_DB_PRIMARY_URL` or `DATABASE_URL`
    /// - `MURMUR_DB_REPLICA_URL`
    #[validate(url(message = "Invalid Postgres connection URL"))]
    pub url: String,
}

// The connection url may contain credentials.
impl std::fmt::Debug for DbPoolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbPoolConfig")
            .field("readonly", &self.readonly)
            .field("min_idle", &self.min_idle)
            .field("pool_size", &self.pool_size)
            .field("url", &"<redacted>")
            .finish()
    }
}

impl DbPoolConfig {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_pool_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_POOL_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    const fn default_enforce_tls() -> bool {
        true
    }

    const fn default_run_migrations() -> bool {
        true
    }
}
