use mongodb::bson::{Bson, Document, oid::ObjectId};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::error::ListingError;

/// Maximum number of listings returned by the featured query
pub const FEATURED_LIMIT: i64 = 6;

/// Fields a client may never write through an update.
/// `email` and `userName` are split off during deserialization.
const PROTECTED_FIELDS: [&str; 2] = ["_id", "likeCount"];

/// Listing availability as stored in the `availability` field
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum Availability {
    #[serde(rename = "Available")]
    #[strum(serialize = "Available")]
    Available,
    #[serde(rename = "Not Available")]
    #[strum(serialize = "Not Available")]
    NotAvailable,
}

/// A roommate listing as stored in MongoDB.
///
/// Listings are schemaless beyond a handful of well-known keys, so the body
/// stays an open [`Document`] and the known keys are read through accessors.
/// Serializes as `{"_id": "<hex>", ...fields}` with BSON values rendered as
/// relaxed extended JSON.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Listing {
    #[serde(
        rename = "_id",
        serialize_with = "mongodb::bson::serde_helpers::serialize_object_id_as_hex_string"
    )]
    #[schema(value_type = String, example = "65a1b2c3d4e5f60718293a4b")]
    pub id: ObjectId,

    #[serde(flatten, serialize_with = "serialize_relaxed")]
    #[schema(value_type = Object)]
    pub fields: Document,
}

fn serialize_relaxed<S: Serializer>(fields: &Document, serializer: S) -> Result<S::Ok, S::Error> {
    Bson::Document(fields.clone())
        .into_relaxed_extjson()
        .serialize(serializer)
}

impl Listing {
    /// Owner's email
    pub fn email(&self) -> Option<&str> {
        self.fields.get_str("email").ok()
    }

    /// Author name recorded at creation
    pub fn user_name(&self) -> Option<&str> {
        self.fields.get_str("userName").ok()
    }

    /// Parsed availability; `None` when absent or not a known value
    pub fn availability(&self) -> Option<Availability> {
        self.fields.get_str("availability").ok()?.parse().ok()
    }

    /// Number of likes; an absent counter reads as zero
    pub fn like_count(&self) -> i64 {
        match self.fields.get("likeCount") {
            Some(Bson::Int32(n)) => i64::from(*n),
            Some(Bson::Int64(n)) => *n,
            Some(Bson::Double(n)) => *n as i64,
            _ => 0,
        }
    }

    /// Plain email comparison; there is no stronger identity behind it.
    pub fn is_owned_by(&self, email: &str) -> bool {
        self.email() == Some(email)
    }

    /// Strict comparison of a client-supplied JSON value with the stored
    /// `email`. Values of a different type never match.
    pub fn is_claimed_by(&self, claimed: &Value) -> bool {
        self.fields
            .get("email")
            .is_some_and(|stored| stored.clone().into_relaxed_extjson() == *claimed)
    }
}

/// Whether a client-supplied identity counts as absent: null, `false`, `0`
/// and the empty string.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

/// Convert a JSON object into a BSON document, keys taken literally.
fn object_to_document(object: Map<String, Value>) -> Document {
    object
        .into_iter()
        .map(|(key, value)| (key, json_to_bson(value)))
        .collect()
}

/// Integers use the narrowest of i32 and i64 that fits; anything larger is
/// stored as a double.
fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32),
            None => n.as_f64().map_or(Bson::Null, Bson::Double),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(json_to_bson).collect()),
        Value::Object(object) => Bson::Document(object_to_document(object)),
    }
}

impl TryFrom<Document> for Listing {
    type Error = ListingError;

    fn try_from(mut doc: Document) -> Result<Self, Self::Error> {
        match doc.remove("_id") {
            Some(Bson::ObjectId(id)) => Ok(Listing { id, fields: doc }),
            other => Err(ListingError::Internal(format!(
                "Stored listing has a non-ObjectId _id: {:?}",
                other
            ))),
        }
    }
}

/// Body of `POST /listings`: any JSON object, stored as given
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct NewListing(pub Map<String, Value>);

impl NewListing {
    /// Convert to a BSON document. A client-supplied `_id` is dropped so the
    /// store always assigns an ObjectId.
    pub fn into_document(self) -> Document {
        let mut body = self.0;
        body.remove("_id");
        object_to_document(body)
    }
}

/// Body of `PUT /listings/{id}`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateListing {
    /// Must match the listing owner's email
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,

    /// Accepted and discarded; the author name is write-once
    #[serde(rename = "userName")]
    #[schema(value_type = Option<String>)]
    pub user_name: Option<Value>,

    /// Every other key, applied with `$set`
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub changes: Map<String, Value>,
}

impl UpdateListing {
    /// The `$set` payload with protected keys removed
    pub fn into_patch(self) -> Document {
        let mut changes = self.changes;
        for key in PROTECTED_FIELDS {
            changes.remove(key);
        }
        object_to_document(changes)
    }
}

/// Body of `PUT /listings/{id}/like`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LikeRequest {
    #[serde(rename = "userEmail")]
    #[schema(value_type = Option<String>)]
    pub user_email: Option<Value>,
}

/// `?email=` query used by the owner listing and delete routes
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OwnerQuery {
    /// Owner email
    pub email: Option<String>,
}

/// Result of an insert, shaped like the driver's insert acknowledgement
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InsertedListing {
    pub acknowledged: bool,
    #[serde(rename = "insertedId")]
    #[schema(example = "65a1b2c3d4e5f60718293a4b")]
    pub inserted_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub message: String,
    #[serde(rename = "likeCount")]
    pub like_count: i64,
}

/// Whether an update changed the stored document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Modified,
    Unchanged,
}

impl UpdateOutcome {
    pub fn message(self) -> &'static str {
        match self {
            UpdateOutcome::Modified => "Listing updated",
            UpdateOutcome::Unchanged => "No changes made",
        }
    }
}
