//! JSON body and query string extractors with JSON error bodies.
//!
//! axum's own `Json` and `Query` reject with plain-text bodies. These wrappers
//! route the rejection through [`AppError`] so clients always receive an
//! [`ErrorResponse`](crate::errors::ErrorResponse).

use crate::errors::AppError;
use axum::{
    Json,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{HeaderMap, header, request::Parts},
};
use serde::de::DeserializeOwned;

/// `Json<T>` with a structured rejection.
///
/// # Example
/// ```ignore
/// use axum_helpers::extractors::JsonBody;
///
/// async fn create(JsonBody(payload): JsonBody<serde_json::Value>) -> String {
///     payload.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// JSON body that reads as `{}` when the request carries no JSON.
///
/// A request without a JSON content type, or with a blank body, decodes `T`
/// from an empty object, so required-field checks run in the handler instead
/// of failing at extraction. A non-blank JSON body is decoded like
/// [`JsonBody`].
#[derive(Debug, Clone)]
pub struct JsonOrEmpty<T>(pub T);

impl<T, S> FromRequest<S> for JsonOrEmpty<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = has_json_content_type(req.headers());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;

        if !is_json || bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonOrEmpty(Json::<T>::from_bytes(b"{}")?.0));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)?;
        Ok(JsonOrEmpty(value))
    }
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// `Query<T>` with a structured rejection.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(QueryParams(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::{get, post, put},
    };
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        name: String,
    }

    #[derive(Deserialize)]
    struct Lenient {
        name: Option<String>,
    }

    #[derive(Deserialize)]
    struct Filter {
        limit: Option<u32>,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/echo",
                post(|JsonBody(p): JsonBody<Payload>| async move { p.name }),
            )
            .route(
                "/lenient",
                put(|JsonOrEmpty(p): JsonOrEmpty<Lenient>| async move {
                    p.name.unwrap_or_else(|| "none".to_string())
                }),
            )
            .route(
                "/filter",
                get(|QueryParams(f): QueryParams<Filter>| async move {
                    f.limit.unwrap_or_default().to_string()
                }),
            )
    }

    #[tokio::test]
    async fn test_json_body_accepts_valid_payload() {
        let response = app()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"room"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_json_yields_json_error() {
        let response = app()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "JSON_EXTRACTION");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_bad_request() {
        let response = app()
            .oneshot(
                Request::post("/echo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":5}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let response = app()
            .oneshot(Request::post("/echo").body(Body::from(r#"{"name":"room"}"#)).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    async fn lenient(request: Request<Body>) -> (StatusCode, String) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_json_or_empty_without_body_reads_empty_object() {
        let (status, body) = lenient(Request::put("/lenient").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "none");
    }

    #[tokio::test]
    async fn test_json_or_empty_with_blank_json_body() {
        let request = Request::put("/lenient")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("  \n"))
            .unwrap();
        let (status, body) = lenient(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "none");
    }

    #[tokio::test]
    async fn test_json_or_empty_decodes_json_body() {
        let request = Request::put("/lenient")
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(Body::from(r#"{"name":"room"}"#))
            .unwrap();
        let (status, body) = lenient(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "room");
    }

    #[tokio::test]
    async fn test_json_or_empty_ignores_non_json_body() {
        let request = Request::put("/lenient")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("name=room"))
            .unwrap();
        let (status, body) = lenient(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "none");
    }

    #[tokio::test]
    async fn test_json_or_empty_rejects_malformed_json() {
        let request = Request::put("/lenient")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        let (status, _) = lenient(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bad_query_yields_json_error() {
        let response = app()
            .oneshot(
                Request::get("/filter?limit=lots")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "QUERY_EXTRACTION");
    }
}
