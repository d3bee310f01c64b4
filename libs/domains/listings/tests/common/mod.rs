//! In-memory repository shared by the handler tests

use async_trait::async_trait;
use domain_listings::{Availability, Listing, ListingRepository, ListingResult, NewListing};
use mongodb::bson::{Bson, Document, oid::ObjectId};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryListingRepository {
    listings: Mutex<Vec<Listing>>,
}

impl InMemoryListingRepository {
    pub fn with_listings(listings: Vec<Listing>) -> Self {
        Self {
            listings: Mutex::new(listings),
        }
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn find_by_owner(&self, email: &str) -> ListingResult<Vec<Listing>> {
        let listings = self.listings.lock().unwrap();
        Ok(listings
            .iter()
            .filter(|l| l.is_owned_by(email))
            .cloned()
            .collect())
    }

    async fn find_available(&self, limit: i64) -> ListingResult<Vec<Listing>> {
        let listings = self.listings.lock().unwrap();
        Ok(listings
            .iter()
            .filter(|l| l.availability() == Some(Availability::Available))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> ListingResult<Vec<Listing>> {
        Ok(self.listings.lock().unwrap().clone())
    }

    async fn insert(&self, listing: NewListing) -> ListingResult<ObjectId> {
        let id = ObjectId::new();
        let fields = listing.into_document();
        self.listings.lock().unwrap().push(Listing { id, fields });
        Ok(id)
    }

    async fn find_by_id(&self, id: ObjectId) -> ListingResult<Option<Listing>> {
        let listings = self.listings.lock().unwrap();
        Ok(listings.iter().find(|l| l.id == id).cloned())
    }

    async fn set_fields(&self, id: ObjectId, fields: Document) -> ListingResult<u64> {
        let mut listings = self.listings.lock().unwrap();
        let Some(listing) = listings.iter_mut().find(|l| l.id == id) else {
            return Ok(0);
        };

        let mut modified = false;
        for (key, value) in fields {
            if listing.fields.get(&key) != Some(&value) {
                listing.fields.insert(key, value);
                modified = true;
            }
        }
        Ok(u64::from(modified))
    }

    async fn delete(&self, id: ObjectId) -> ListingResult<u64> {
        let mut listings = self.listings.lock().unwrap();
        let before = listings.len();
        listings.retain(|l| l.id != id);
        Ok((before - listings.len()) as u64)
    }

    async fn increment_likes(&self, id: ObjectId) -> ListingResult<u64> {
        let mut listings = self.listings.lock().unwrap();
        let Some(listing) = listings.iter_mut().find(|l| l.id == id) else {
            return Ok(0);
        };
        let next = listing.like_count() + 1;
        listing.fields.insert("likeCount", Bson::Int64(next));
        Ok(1)
    }
}
