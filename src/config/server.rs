use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::ParseError;
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

/// Which storage backend holds users, follows and posts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_storage"))]
pub struct Server {
    /// **Environment variable**: `MURMUR_STORAGE`
    #[serde(default)]
    pub storage: StorageKind,
    /// Required if `storage` is set to `postgres`.
    #[validate]
    pub db: Option<super::Database>,
    #[serde(default)]
    #[validate]
    pub http: super::Http,
    #[serde(default)]
    pub logging: super::Logging,
}

fn validate_storage(server: &Server) -> std::result::Result<(), ValidationError> {
    if server.storage == StorageKind::Postgres && server.db.is_none() {
        let mut error = ValidationError::new("missing_db");
        error.message = Some("`db` section is required for postgres storage".into());
        return Err(error);
    }
    Ok(())
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .validate()
            .into_validator_report()
            .change_context(ParseError)?;

        Ok(config)
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "murmur.toml";

    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            // Env provider cannot tell apart nested keys from
            // keys with underscores in them.
            .merge(Env::prefixed("MURMUR_").map(|v| {
                match v.as_str().to_ascii_uppercase().as_str() {
                    "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                    "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                    "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                    "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                    "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                    "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),
                    "DB_RUN_MIGRATIONS" => "db.run_migrations".into(),

                    _ => v.as_str().replace('_', ".").into(),
                }
            }))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "RUST_LOG"])
                    .map(|v| match v.as_str().to_ascii_uppercase().as_str() {
                        "DATABASE_URL" => "db.primary.url".into(),
                        "RUST_LOG" => "logging.targets".into(),
                        _ => v.into(),
                    }),
            )
    }
}
