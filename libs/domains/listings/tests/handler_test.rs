//! Handler tests for Listings domain
//!
//! These tests drive the listings router end to end over an in-memory
//! repository:
//! - Request extraction (path ids, query strings, JSON bodies)
//! - Response serialization and HTTP status codes
//! - Error bodies
//!
//! A second group runs against a MongoDB repository whose server does not
//! exist, to check the unavailable-store path without Docker.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::InMemoryListingRepository;
use database::mongodb::{LazyCollection, MongoConfig};
use domain_listings::{
    InsertedListing, LikeResponse, Listing, ListingService, MessageResponse,
    MongoListingRepository, handlers,
};
use http_body_util::BodyExt;
use mongodb::bson::{doc, oid::ObjectId};
use serde_json::{Value, json};
use std::sync::Arc;
use test_utils::TestDataBuilder;
use tower::ServiceExt; // For oneshot()

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn app_with(listings: Vec<Listing>) -> Router {
    let repo = InMemoryListingRepository::with_listings(listings);
    handlers::router(ListingService::new(repo))
}

fn empty_app() -> Router {
    app_with(vec![])
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn seeded(owner: &str) -> (ObjectId, Listing) {
    let id = ObjectId::new();
    let listing = Listing {
        id,
        fields: doc! {
            "email": owner,
            "userName": "Owner",
            "title": "Room near campus",
            "availability": "Available",
        },
    };
    (id, listing)
}

#[tokio::test]
async fn test_create_then_get_returns_submitted_fields() {
    let app = empty_app();
    let builder = TestDataBuilder::from_test_name("handler_create_get");
    let owner = builder.email("owner");

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({
                "email": owner,
                "userName": "A",
                "availability": "Available",
                "rent": 450
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let inserted: InsertedListing = json_body(response.into_body()).await;
    assert!(inserted.acknowledged);
    assert_eq!(inserted.inserted_id.len(), 24);

    let response = app
        .oneshot(get(&format!("/{}", inserted.inserted_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listing: Value = json_body(response.into_body()).await;
    assert_eq!(
        listing,
        json!({
            "_id": inserted.inserted_id,
            "email": owner,
            "userName": "A",
            "availability": "Available",
            "rent": 450
        })
    );
    assert!(listing.get("likeCount").is_none());
}

#[tokio::test]
async fn test_create_accepts_empty_object() {
    let response = empty_app()
        .oneshot(json_request("POST", "/", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_create_rejects_non_object_body() {
    let response = empty_app()
        .oneshot(json_request("POST", "/", json!(["not", "an", "object"])))
        .await
        .unwrap();
    assert!(response.status().is_client_error());

    let body: Value = json_body(response.into_body()).await;
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_list_by_owner_requires_email() {
    for uri in ["/", "/?email="] {
        let response = empty_app().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: MessageResponse = json_body(response.into_body()).await;
        assert_eq!(body.message, "Email is required");
    }
}

#[tokio::test]
async fn test_list_by_owner_filters_by_email() {
    let (_, mine) = seeded("a@x.com");
    let (_, theirs) = seeded("b@x.com");
    let app = app_with(vec![mine, theirs]);

    let response = app.oneshot(get("/?email=a%40x.com")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listings: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0]["email"], "a@x.com");
}

#[tokio::test]
async fn test_featured_returns_at_most_six_available() {
    let mut listings = Vec::new();
    for i in 0..8 {
        listings.push(Listing {
            id: ObjectId::new(),
            fields: doc! { "email": format!("u{}@x.com", i), "availability": "Available" },
        });
    }
    listings.push(Listing {
        id: ObjectId::new(),
        fields: doc! { "email": "z@x.com", "availability": "Not Available" },
    });

    let response = app_with(listings).oneshot(get("/featured")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let featured: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(featured.len(), 6);
    assert!(featured.iter().all(|l| l["availability"] == "Available"));
}

#[tokio::test]
async fn test_all_returns_every_listing() {
    let (_, a) = seeded("a@x.com");
    let (_, b) = seeded("b@x.com");

    let response = app_with(vec![a, b]).oneshot(get("/all")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let all: Vec<Value> = json_body(response.into_body()).await;
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_get_with_malformed_id_is_bad_request() {
    let response = empty_app().oneshot(get("/not-an-id")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Invalid ID");
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let response = empty_app()
        .oneshot(get(&format!("/{}", ObjectId::new().to_hex())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Listing not found");
}

#[tokio::test]
async fn test_get_twice_is_stable() {
    let (id, listing) = seeded("a@x.com");
    let app = app_with(vec![listing]);
    let uri = format!("/{}", id.to_hex());

    let first: Value = json_body(app.clone().oneshot(get(&uri)).await.unwrap().into_body()).await;
    let second: Value = json_body(app.oneshot(get(&uri)).await.unwrap().into_body()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_update_flow() {
    let (id, listing) = seeded("a@x.com");
    let app = app_with(vec![listing]);
    let uri = format!("/{}", id.to_hex());

    // Wrong owner
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "email": "b@x.com", "title": "Hijacked" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Unauthorized to update this listing");

    // Missing email
    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "title": "No email" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Email required for update authorization");

    // Nothing left after stripping identity fields
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "email": "a@x.com", "userName": "Someone else" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "No fields to update");

    // Owner update
    let change = json!({ "email": "a@x.com", "userName": "Renamed", "title": "Quiet room" });
    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, change.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Listing updated");

    // Same values again
    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, change))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "No changes made");

    // Identity fields untouched
    let listing: Value = json_body(app.oneshot(get(&uri)).await.unwrap().into_body()).await;
    assert_eq!(listing["title"], "Quiet room");
    assert_eq!(listing["email"], "a@x.com");
    assert_eq!(listing["userName"], "Owner");
}

#[tokio::test]
async fn test_update_cannot_touch_like_count() {
    let (id, listing) = seeded("a@x.com");
    let app = app_with(vec![listing]);
    let uri = format!("/{}", id.to_hex());

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &uri,
            json!({ "email": "a@x.com", "likeCount": 500, "title": "Same" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let listing: Value = json_body(app.oneshot(get(&uri)).await.unwrap().into_body()).await;
    assert!(listing.get("likeCount").is_none());
}

#[tokio::test]
async fn test_delete_flow() {
    let (id, listing) = seeded("a@x.com");
    let app = app_with(vec![listing]);
    let uri = format!("/{}", id.to_hex());

    let response = app
        .clone()
        .oneshot(Request::delete(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Email query parameter required");

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("{}?email=b@x.com", uri))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Unauthorized to delete this listing");

    let response = app
        .clone()
        .oneshot(
            Request::delete(format!("{}?email=a@x.com", uri))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Listing deleted");

    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_flow() {
    let (id, listing) = seeded("a@x.com");
    let app = app_with(vec![listing]);
    let uri = format!("/{}/like", id.to_hex());

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "userEmail": "b@x.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: LikeResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Liked");
    assert_eq!(body.like_count, 1);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "userEmail": "c@x.com" })))
        .await
        .unwrap();
    let body: LikeResponse = json_body(response.into_body()).await;
    assert_eq!(body.like_count, 2);

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "userEmail": "a@x.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "You cannot like your own post");

    let response = app
        .oneshot(json_request("PUT", &uri, json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User email is required");
}

#[tokio::test]
async fn test_like_unknown_listing_is_not_found() {
    let uri = format!("/{}/like", ObjectId::new().to_hex());
    let response = empty_app()
        .oneshot(json_request("PUT", &uri, json!({ "userEmail": "b@x.com" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_like_without_body_asks_for_user_email() {
    let (id, listing) = seeded("a@x.com");
    let uri = format!("/{}/like", id.to_hex());

    let response = app_with(vec![listing])
        .oneshot(Request::put(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "User email is required");
}

#[tokio::test]
async fn test_update_without_body_asks_for_email() {
    let (id, listing) = seeded("a@x.com");
    let uri = format!("/{}", id.to_hex());

    let response = app_with(vec![listing])
        .oneshot(Request::put(uri.as_str()).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Email required for update authorization");
}

#[tokio::test]
async fn test_update_with_numeric_email_is_forbidden() {
    let (id, listing) = seeded("a@x.com");
    let app = app_with(vec![listing]);
    let uri = format!("/{}", id.to_hex());

    let response = app
        .clone()
        .oneshot(json_request("PUT", &uri, json!({ "email": 5, "title": "x" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: MessageResponse = json_body(response.into_body()).await;
    assert_eq!(body.message, "Unauthorized to update this listing");

    let listing: Value = json_body(app.oneshot(get(&uri)).await.unwrap().into_body()).await;
    assert_eq!(listing["title"], "Room near campus");
}

#[tokio::test]
async fn test_like_with_numeric_email_is_accepted() {
    let (id, listing) = seeded("a@x.com");
    let uri = format!("/{}/like", id.to_hex());

    let response = app_with(vec![listing])
        .oneshot(json_request("PUT", &uri, json!({ "userEmail": 7 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: LikeResponse = json_body(response.into_body()).await;
    assert_eq!(body.like_count, 1);
}

#[tokio::test]
async fn test_create_accepts_integer_beyond_i64() {
    let app = empty_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/",
            json!({ "email": "a@x.com", "n": 18446744073709551615_u64 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: InsertedListing = json_body(response.into_body()).await;

    let listing: Value = json_body(
        app.oneshot(get(&format!("/{}", created.inserted_id)))
            .await
            .unwrap()
            .into_body(),
    )
    .await;
    assert_eq!(listing["n"].as_f64(), Some(18446744073709551615_u64 as f64));
}

fn unreachable_app() -> Router {
    let config =
        MongoConfig::new("mongodb://127.0.0.1:1/?directConnection=true").with_timeouts(1, 1);
    let store = Arc::new(LazyCollection::new(config, "roommateListings"));
    handlers::router(ListingService::new(MongoListingRepository::new(store)))
}

#[tokio::test]
async fn test_unreachable_store_returns_503() {
    let app = unreachable_app();
    let id = ObjectId::new().to_hex();

    let requests = vec![
        get("/all"),
        get("/featured"),
        get("/?email=a@x.com"),
        get(&format!("/{}", id)),
        json_request("POST", "/", json!({ "email": "a@x.com" })),
    ];

    for request in requests {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body: MessageResponse = json_body(response.into_body()).await;
        assert_eq!(body.message, "Database not ready. Try again later.");
    }
}

#[tokio::test]
async fn test_input_errors_win_over_unreachable_store() {
    let app = unreachable_app();

    // Validated before the store is touched
    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get("/zzz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
