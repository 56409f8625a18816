//! JSON API over the murmur services.
pub mod controllers;
pub mod error;
pub mod forms;

pub use self::controllers::configure;

#[cfg(test)]
mod tests;
