#![cfg_attr(test, allow(clippy::unwrap_used))]
pub mod app;
pub mod config;
pub mod entity;
pub mod error;
pub mod http;
pub mod server;
pub mod services;
pub mod store;
pub mod types;
pub mod util;

pub use self::app::App;
pub use self::error::{Error, ErrorCategory, Result};

pub(crate) mod internal;

#[cfg(test)]
mod test_utils;
