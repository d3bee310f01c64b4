use crate::state::AppState;
use axum::{Router, routing::get};

pub mod health;
pub mod listings;

/// Banner returned by `GET /`
pub const BANNER: &str = "🚀 Roommate Finder API Running";

async fn root() -> &'static str {
    BANNER
}

/// Create all API routes
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/listings", listings::router(state))
        .merge(health::router(state.clone()))
}
