use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use database::mongodb::MongoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingError {
    /// A required input is absent or empty; carries the client-facing message
    #[error("{0}")]
    MissingField(&'static str),

    #[error("No fields to update")]
    NothingToUpdate,

    #[error("Listing not found")]
    NotFound,

    /// Caller is not allowed to act on this listing
    #[error("{0}")]
    Forbidden(&'static str),

    /// The store could not be reached or rejected the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

pub type ListingResult<T> = Result<T, ListingError>;

/// Convert ListingError to AppError for standardized error responses
impl From<ListingError> for AppError {
    fn from(err: ListingError) -> Self {
        match err {
            ListingError::MissingField(msg) => AppError::BadRequest(msg.to_string()),
            ListingError::NothingToUpdate => AppError::BadRequest(err.to_string()),
            ListingError::NotFound => AppError::NotFound(err.to_string()),
            ListingError::Forbidden(msg) => AppError::Forbidden(msg.to_string()),
            ListingError::Unavailable(detail) => AppError::ServiceUnavailable(detail),
            ListingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ListingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<MongoError> for ListingError {
    fn from(err: MongoError) -> Self {
        ListingError::Unavailable(err.to_string())
    }
}

impl From<mongodb::error::Error> for ListingError {
    fn from(err: mongodb::error::Error) -> Self {
        ListingError::Unavailable(err.to_string())
    }
}
