use crate::state::AppState;
use axum::Router;
use domain_listings::{ListingService, MongoListingRepository, handlers};

/// Create listing routes over the shared lazily connected collection
pub fn router(state: &AppState) -> Router {
    let repository = MongoListingRepository::new(state.store.clone());
    let service = ListingService::new(repository);

    handlers::router(service)
}
