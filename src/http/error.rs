use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};

use crate::types::{PostId, UserId};
use crate::util::validator::describe_errors;
use crate::{Error, ErrorCategory, Result};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.category() {
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::InvalidArgument | ErrorCategory::Conflict => StatusCode::BAD_REQUEST,
            ErrorCategory::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        if self.category() == ErrorCategory::Internal {
            tracing::error!(error = %self, "failed to perform request");
        }
        HttpResponse::build(self.status_code()).json(self)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = describe_errors(&errors).join(", ");
        Error::invalid_argument(format!("Invalid form body: {fields}"))
    }
}

/// Resolves ids taken from the request path. There are no records
/// with id 0, so it resolves to a not found error.
pub fn user_id(raw: u64) -> Result<UserId> {
    UserId::new_checked(raw).ok_or_else(|| Error::not_found("User does not exist"))
}

pub fn post_id(raw: u64) -> Result<PostId> {
    PostId::new_checked(raw).ok_or_else(|| Error::not_found("Post does not exist"))
}
