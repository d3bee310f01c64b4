//! ObjectId path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use mongodb::bson::oid::ObjectId;

/// Extractor for a single MongoDB ObjectId path parameter.
///
/// Rejects anything that is not a 24-character hex id with a 400 JSON body
/// (`"Invalid ID"`) before the handler, and so the store, is ever reached.
///
/// # Example
/// ```ignore
/// use axum::Router;
/// use axum::routing::get;
/// use axum_helpers::extractors::ObjectIdPath;
///
/// async fn get_listing(ObjectIdPath(id): ObjectIdPath) -> String {
///     format!("Listing ID: {}", id.to_hex())
/// }
///
/// let app = Router::new().route("/listings/{id}", get(get_listing));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ObjectIdPath(pub ObjectId);

impl<S> FromRequestParts<S> for ObjectIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        ObjectId::parse_str(&raw)
            .map(ObjectIdPath)
            .map_err(|_| AppError::InvalidObjectId(raw))
    }
}
