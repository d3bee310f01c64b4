//! Custom extractors for Axum handlers.
//!
//! Every rejection produced here renders as a JSON
//! [`ErrorResponse`](crate::errors::ErrorResponse).

pub mod json_body;
pub mod object_id_path;

pub use json_body::{JsonBody, JsonOrEmpty, QueryParams};
pub use object_id_path::ObjectIdPath;
