use thiserror::Error;

mod database;
mod http;
mod server;

pub use self::database::{Database, DbPoolConfig};
pub use self::http::Http;
pub use self::server::{Server, StorageKind};
pub use murmur_tracing::Logging;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
