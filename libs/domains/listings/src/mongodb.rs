//! MongoDB implementation of ListingRepository

use async_trait::async_trait;
use database::mongodb::LazyCollection;
use futures::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Document, doc, oid::ObjectId},
    options::FindOptions,
};
use std::sync::Arc;
use tracing::instrument;

use crate::error::{ListingError, ListingResult};
use crate::models::{Availability, Listing, NewListing};
use crate::repository::ListingRepository;

/// MongoDB implementation of the ListingRepository
///
/// Every call goes through the shared [`LazyCollection`], so the first
/// request connects and an unreachable store surfaces as
/// [`ListingError::Unavailable`] on that request only.
pub struct MongoListingRepository {
    store: Arc<LazyCollection>,
}

impl MongoListingRepository {
    /// # Example
    /// ```ignore
    /// let store = Arc::new(LazyCollection::new(MongoConfig::from_env()?, "roommateListings"));
    /// let repo = MongoListingRepository::new(store.clone());
    /// ```
    pub fn new(store: Arc<LazyCollection>) -> Self {
        Self { store }
    }

    async fn collection(&self) -> ListingResult<&Collection<Document>> {
        Ok(self.store.connect().await?)
    }

    async fn find_many(&self, filter: Document, limit: Option<i64>) -> ListingResult<Vec<Listing>> {
        let options = FindOptions::builder().limit(limit).build();

        let cursor = self
            .collection()
            .await?
            .find(filter)
            .with_options(options)
            .await?;
        let docs: Vec<Document> = cursor.try_collect().await?;

        docs.into_iter().map(Listing::try_from).collect()
    }

    fn id_filter(id: ObjectId) -> Document {
        doc! { "_id": id }
    }

    fn owner_filter(email: &str) -> Document {
        doc! { "email": email }
    }

    fn available_filter() -> Document {
        doc! { "availability": Availability::Available.to_string() }
    }
}

#[async_trait]
impl ListingRepository for MongoListingRepository {
    #[instrument(skip(self))]
    async fn find_by_owner(&self, email: &str) -> ListingResult<Vec<Listing>> {
        self.find_many(Self::owner_filter(email), None).await
    }

    #[instrument(skip(self))]
    async fn find_available(&self, limit: i64) -> ListingResult<Vec<Listing>> {
        self.find_many(Self::available_filter(), Some(limit)).await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> ListingResult<Vec<Listing>> {
        self.find_many(doc! {}, None).await
    }

    #[instrument(skip(self, listing))]
    async fn insert(&self, listing: NewListing) -> ListingResult<ObjectId> {
        let document = listing.into_document();
        let result = self.collection().await?.insert_one(document).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            ListingError::Internal(format!(
                "Store returned a non-ObjectId id: {}",
                result.inserted_id
            ))
        })?;

        tracing::info!(listing_id = %id, "Listing created");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> ListingResult<Option<Listing>> {
        self.collection()
            .await?
            .find_one(Self::id_filter(id))
            .await?
            .map(Listing::try_from)
            .transpose()
    }

    #[instrument(skip(self, fields))]
    async fn set_fields(&self, id: ObjectId, fields: Document) -> ListingResult<u64> {
        let result = self
            .collection()
            .await?
            .update_one(Self::id_filter(id), doc! { "$set": fields })
            .await?;

        tracing::info!(listing_id = %id, modified = result.modified_count, "Listing updated");
        Ok(result.modified_count)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> ListingResult<u64> {
        let result = self
            .collection()
            .await?
            .delete_one(Self::id_filter(id))
            .await?;

        tracing::info!(listing_id = %id, deleted = result.deleted_count, "Listing deleted");
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn increment_likes(&self, id: ObjectId) -> ListingResult<u64> {
        let result = self
            .collection()
            .await?
            .update_one(Self::id_filter(id), doc! { "$inc": { "likeCount": 1 } })
            .await?;

        Ok(result.modified_count)
    }
}
