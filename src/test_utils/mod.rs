use std::fmt::Debug;
use std::sync::Arc;

use crate::store::MemoryStore;
use crate::{config, App, Error};

mod flaky;
pub mod users;

pub use self::flaky::{FlakyStore, FAILURE_CAUSE};

/// Builds an [`App`] backed by a fresh [`MemoryStore`].
pub fn build_test_app() -> App {
    murmur_tracing::init_for_tests();
    App::with_store(config::Server::default(), Arc::new(MemoryStore::new()))
}

/// Builds an [`App`] backed by a [`FlakyStore`] so tests can
/// inject storage failures and inspect batched reads.
pub fn build_test_app_with(store: FlakyStore) -> App {
    murmur_tracing::init_for_tests();
    App::with_store(config::Server::default(), Arc::new(store))
}

pub trait TestResultExt {
    /// Serializes the error into [`serde_json::Value`] the same
    /// way it is sent over HTTP.
    ///
    /// ## Panics
    /// It will panic if the result is [`Ok`].
    fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for std::result::Result<T, Error> {
    fn expect_error_json(self) -> serde_json::Value {
        match self {
            Ok(okay) => panic!("unexpected value Ok({okay:?}), expected error"),
            Err(error) => serde_json::to_value(error).unwrap(),
        }
    }
}
