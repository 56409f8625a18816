use error_stack::Report;
use serde::ser::SerializeStruct;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Display;
use tracing_error::SpanTrace;

use crate::store;

pub type Result<T> = std::result::Result<T, Error>;

/// Possible error outcomes of a murmur operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// A referenced user or post does not exist.
    NotFound,
    /// The request itself is malformed, such as following yourself.
    InvalidArgument,
    /// The request collides with the current state, such as following
    /// someone twice.
    Conflict,
    /// Storage failed unexpectedly.
    Internal,
}

impl ErrorCategory {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("Resource not found"),
            Self::InvalidArgument => f.write_str("Invalid argument"),
            Self::Conflict => f.write_str("Conflicting request"),
            Self::Internal => f.write_str("Failed to perform request"),
        }
    }
}

pub struct Error {
    category: ErrorCategory,
    message: Cow<'static, str>,
    report: Option<Report<store::Error>>,
    trace: SpanTrace,
}

impl Error {
    #[must_use]
    pub fn new(category: ErrorCategory, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            category,
            message: message.into(),
            report: None,
            trace: SpanTrace::capture(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::NotFound, message)
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::InvalidArgument, message)
    }

    #[must_use]
    pub fn conflict(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorCategory::Conflict, message)
    }

    /// The message is taken from the current context of the report,
    /// which carries the underlying cause for [`store::Error::Internal`].
    #[must_use]
    pub fn from_report(category: ErrorCategory, report: Report<store::Error>) -> Self {
        Self {
            category,
            message: report.current_context().to_string().into(),
            report: Some(report),
            trace: SpanTrace::capture(),
        }
    }
}

impl Error {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report<store::Error>> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Message that is safe to show to clients. Internal failures
    /// never leak their cause.
    #[must_use]
    pub fn public_message(&self) -> Cow<'_, str> {
        match self.category {
            ErrorCategory::Internal => Cow::Owned(self.category.to_string()),
            _ => Cow::Borrowed(&self.message),
        }
    }
}

impl From<Report<store::Error>> for Error {
    fn from(report: Report<store::Error>) -> Self {
        Self::from_report(ErrorCategory::Internal, report)
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("category", &self.category)
            .field("message", &self.message)
            .field("report", &self.report)
            .field("trace", &self.trace)
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.message)?;
        if let Some(report) = self.report.as_ref() {
            write!(f, "\n{report:?}")?;
        }
        write!(f, "\n{}", self.trace)
    }
}

impl std::error::Error for Error {}

impl Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Error", 2)?;
        state.serialize_field("code", &self.category)?;
        state.serialize_field("message", &self.public_message())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use static_assertions::assert_impl_all;

    assert_impl_all!(Error: std::fmt::Debug, Display, Send, Sync, Serialize);

    #[test]
    fn test_serialize_categories() {
        let error = Error::conflict("Already following user");
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "code": "conflict", "message": "Already following user" })
        );

        let error = Error::not_found("User does not exist");
        assert_eq!(serde_json::to_value(&error).unwrap()["code"], "not_found");
        assert_eq!(
            serde_json::to_value(ErrorCategory::InvalidArgument).unwrap(),
            json!(ErrorCategory::InvalidArgument.code())
        );
    }

    #[test]
    fn test_internal_keeps_cause_private() {
        let report = Report::new(store::Error::internal("connection reset"));
        let error = Error::from(report);

        assert_eq!(error.category(), ErrorCategory::Internal);
        assert!(error.message().contains("connection reset"));
        assert!(error.report().is_some());
        assert_eq!(
            serde_json::to_value(&error).unwrap(),
            json!({ "code": "internal", "message": "Failed to perform request" })
        );
    }
}
