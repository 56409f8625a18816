use error_stack::Report;

use crate::store::{Error, Result};

/// Converts from a generic [sqlx] result into a [storage compatible error](Error).
pub trait SqlxResultExt<T> {
    fn into_store_error(self) -> Result<T>;
}

impl<T> SqlxResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn into_store_error(self) -> Result<T> {
        self.map_err(|e| {
            let context = match &e {
                sqlx::Error::Database(err) if err.message().ends_with("read-only transaction") => {
                    Error::Readonly
                }
                sqlx::Error::Database(err) if err.is_unique_violation() => Error::UniqueViolation,
                sqlx::Error::Database(err) if err.is_foreign_key_violation() => {
                    Error::ForeignKeyViolation
                }
                _ => return Report::new(Error::internal(e)),
            };
            Report::new(e).change_context(context)
        })
    }
}
