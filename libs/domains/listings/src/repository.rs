use async_trait::async_trait;
use mongodb::bson::{Document, oid::ObjectId};

use crate::error::ListingResult;
use crate::models::{Listing, NewListing};

/// Repository trait for Listing persistence
///
/// Write operations report the store's modified/deleted counts; deciding
/// what a zero count means is left to the service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// All listings owned by `email`
    async fn find_by_owner(&self, email: &str) -> ListingResult<Vec<Listing>>;

    /// Up to `limit` listings whose availability is "Available"
    async fn find_available(&self, limit: i64) -> ListingResult<Vec<Listing>>;

    async fn find_all(&self) -> ListingResult<Vec<Listing>>;

    /// Insert a listing and return the store-assigned id
    async fn insert(&self, listing: NewListing) -> ListingResult<ObjectId>;

    async fn find_by_id(&self, id: ObjectId) -> ListingResult<Option<Listing>>;

    /// `$set` the given fields; returns the modified count
    async fn set_fields(&self, id: ObjectId, fields: Document) -> ListingResult<u64>;

    /// Returns the deleted count
    async fn delete(&self, id: ObjectId) -> ListingResult<u64>;

    /// `$inc` likeCount by one; returns the modified count
    async fn increment_likes(&self, id: ObjectId) -> ListingResult<u64>;
}
