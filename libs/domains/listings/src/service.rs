//! Listing Service - Business logic layer
//!
//! Ownership is decided by comparing the caller-supplied email with the
//! listing's stored `email`. Nothing authenticates that email.

use mongodb::bson::oid::ObjectId;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ListingError, ListingResult};
use crate::models::{
    FEATURED_LIMIT, LikeRequest, Listing, NewListing, UpdateListing, UpdateOutcome, is_blank,
};
use crate::repository::ListingRepository;

/// Treats an empty string the same as an absent value
fn required<'a>(value: Option<&'a str>, message: &'static str) -> ListingResult<&'a str> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ListingError::MissingField(message))
}

/// Same as [`required`] for body fields, which may hold any JSON type
fn required_value<'a>(value: Option<&'a Value>, message: &'static str) -> ListingResult<&'a Value> {
    value
        .filter(|v| !is_blank(v))
        .ok_or(ListingError::MissingField(message))
}

/// Listing service providing business logic operations
pub struct ListingService<R: ListingRepository> {
    repository: Arc<R>,
}

impl<R: ListingRepository> ListingService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Listings owned by `email`
    #[instrument(skip(self))]
    pub async fn list_by_owner(&self, email: Option<&str>) -> ListingResult<Vec<Listing>> {
        let email = required(email, "Email is required")?;
        self.repository.find_by_owner(email).await
    }

    /// At most [`FEATURED_LIMIT`] available listings
    #[instrument(skip(self))]
    pub async fn list_featured(&self) -> ListingResult<Vec<Listing>> {
        self.repository.find_available(FEATURED_LIMIT).await
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self) -> ListingResult<Vec<Listing>> {
        self.repository.find_all().await
    }

    /// Store the body as given; no field is required
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewListing) -> ListingResult<ObjectId> {
        self.repository.insert(input).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> ListingResult<Listing> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ListingError::NotFound)
    }

    /// Owner-only partial update. `email`, `userName`, `_id` and `likeCount`
    /// are never written.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: ObjectId, input: UpdateListing) -> ListingResult<UpdateOutcome> {
        let listing = self.get(id).await?;

        let email = required_value(
            input.email.as_ref(),
            "Email required for update authorization",
        )?;
        if !listing.is_claimed_by(email) {
            return Err(ListingError::Forbidden("Unauthorized to update this listing"));
        }

        let patch = input.into_patch();
        if patch.is_empty() {
            return Err(ListingError::NothingToUpdate);
        }

        let modified = self.repository.set_fields(id, patch).await?;
        Ok(if modified > 0 {
            UpdateOutcome::Modified
        } else {
            UpdateOutcome::Unchanged
        })
    }

    /// Owner-only permanent delete
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId, email: Option<&str>) -> ListingResult<()> {
        let email = required(email, "Email query parameter required")?;

        let listing = self.get(id).await?;
        if !listing.is_owned_by(email) {
            return Err(ListingError::Forbidden("Unauthorized to delete this listing"));
        }

        // Zero means someone else deleted it after our read
        if self.repository.delete(id).await? == 0 {
            return Err(ListingError::NotFound);
        }
        Ok(())
    }

    /// Add one like from a non-owner and return the new count
    #[instrument(skip(self, input))]
    pub async fn like(&self, id: ObjectId, input: LikeRequest) -> ListingResult<i64> {
        let user_email = required_value(input.user_email.as_ref(), "User email is required")?;

        let listing = self.get(id).await?;
        if listing.is_claimed_by(user_email) {
            return Err(ListingError::Forbidden("You cannot like your own post"));
        }

        if self.repository.increment_likes(id).await? == 0 {
            return Err(ListingError::Internal(
                "Failed to update like count".to_string(),
            ));
        }

        Ok(self.get(id).await?.like_count())
    }
}

impl<R: ListingRepository> Clone for ListingService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}
