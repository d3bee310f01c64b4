//! Listings Domain
//!
//! Roommate listings stored as schemaless MongoDB documents, with
//! owner-checked update/delete and a like counter owners cannot bump.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership rules, field protection
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Listing document, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use database::mongodb::{LazyCollection, MongoConfig};
//! use domain_listings::{handlers, ListingService, MongoListingRepository};
//!
//! let store = Arc::new(LazyCollection::new(
//!     MongoConfig::new("mongodb://localhost:27017"),
//!     "roommateListings",
//! ));
//! let service = ListingService::new(MongoListingRepository::new(store));
//! let router = axum::Router::new().nest("/listings", handlers::router(service));
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{ListingError, ListingResult};
pub use handlers::ApiDoc;
pub use models::{
    Availability, FEATURED_LIMIT, InsertedListing, LikeRequest, LikeResponse, Listing,
    MessageResponse, NewListing, OwnerQuery, UpdateListing, UpdateOutcome,
};
pub use self::mongodb::MongoListingRepository;
pub use repository::ListingRepository;
pub use service::ListingService;
