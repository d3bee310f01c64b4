use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    JsonBody, JsonOrEmpty, ObjectIdPath, QueryParams,
    errors::responses::{
        BadRequestObjectIdResponse, BadRequestResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, ServiceUnavailableResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ListingResult;
use crate::models::{
    Availability, InsertedListing, LikeRequest, LikeResponse, Listing, MessageResponse,
    NewListing, OwnerQuery, UpdateListing,
};
use crate::repository::ListingRepository;
use crate::service::ListingService;

/// OpenAPI documentation for Listings API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_by_owner,
        list_featured,
        list_all,
        create_listing,
        get_listing,
        update_listing,
        delete_listing,
        like_listing,
    ),
    components(
        schemas(
            Listing,
            Availability,
            NewListing,
            UpdateListing,
            LikeRequest,
            InsertedListing,
            MessageResponse,
            LikeResponse
        ),
        responses(
            BadRequestResponse,
            BadRequestObjectIdResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse,
            ServiceUnavailableResponse
        )
    ),
    tags(
        (name = "Listings", description = "Roommate listing endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;

/// Create the listings router with all HTTP endpoints
pub fn router<R: ListingRepository + 'static>(service: ListingService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/", get(list_by_owner).post(create_listing))
        .route("/featured", get(list_featured))
        .route("/all", get(list_all))
        .route(
            "/{id}",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/{id}/like", put(like_listing))
        .with_state(shared_service)
}

/// List the listings owned by an email
#[utoipa::path(
    get,
    path = "",
    tag = "Listings",
    params(OwnerQuery),
    responses(
        (status = 200, description = "Listings owned by the email", body = Vec<Listing>),
        (status = 400, response = BadRequestResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_by_owner<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ListingResult<Json<Vec<Listing>>> {
    let listings = service.list_by_owner(query.email.as_deref()).await?;
    Ok(Json(listings))
}

/// Up to six available listings
#[utoipa::path(
    get,
    path = "/featured",
    tag = "Listings",
    responses(
        (status = 200, description = "Featured listings", body = Vec<Listing>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_featured<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
) -> ListingResult<Json<Vec<Listing>>> {
    Ok(Json(service.list_featured().await?))
}

/// Every listing
#[utoipa::path(
    get,
    path = "/all",
    tag = "Listings",
    responses(
        (status = 200, description = "All listings", body = Vec<Listing>),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn list_all<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
) -> ListingResult<Json<Vec<Listing>>> {
    Ok(Json(service.list_all().await?))
}

/// Create a listing from an arbitrary JSON object
#[utoipa::path(
    post,
    path = "",
    tag = "Listings",
    request_body = NewListing,
    responses(
        (status = 201, description = "Listing created", body = InsertedListing),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn create_listing<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
    JsonBody(input): JsonBody<NewListing>,
) -> ListingResult<impl IntoResponse> {
    let id = service.create(input).await?;
    let body = InsertedListing {
        acknowledged: true,
        inserted_id: id.to_hex(),
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// Get a listing by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Listings",
    params(
        ("id" = String, Path, description = "Listing ObjectId (24 hex characters)")
    ),
    responses(
        (status = 200, description = "Listing found", body = Listing),
        (status = 400, response = BadRequestObjectIdResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn get_listing<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
) -> ListingResult<Json<Listing>> {
    Ok(Json(service.get(id).await?))
}

/// Update a listing; the body's `email` must match the owner
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Listings",
    params(
        ("id" = String, Path, description = "Listing ObjectId (24 hex characters)")
    ),
    request_body = UpdateListing,
    responses(
        (status = 200, description = "\"Listing updated\" or \"No changes made\"", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn update_listing<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    JsonOrEmpty(input): JsonOrEmpty<UpdateListing>,
) -> ListingResult<Json<MessageResponse>> {
    let outcome = service.update(id, input).await?;
    Ok(Json(MessageResponse::new(outcome.message())))
}

/// Delete a listing; `?email=` must match the owner
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Listings",
    params(
        ("id" = String, Path, description = "Listing ObjectId (24 hex characters)"),
        OwnerQuery
    ),
    responses(
        (status = 200, description = "Listing deleted", body = MessageResponse),
        (status = 400, response = BadRequestResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn delete_listing<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    QueryParams(query): QueryParams<OwnerQuery>,
) -> ListingResult<Json<MessageResponse>> {
    service.delete(id, query.email.as_deref()).await?;
    Ok(Json(MessageResponse::new("Listing deleted")))
}

/// Like a listing you do not own
#[utoipa::path(
    put,
    path = "/{id}/like",
    tag = "Listings",
    params(
        ("id" = String, Path, description = "Listing ObjectId (24 hex characters)")
    ),
    request_body = LikeRequest,
    responses(
        (status = 200, description = "Like recorded", body = LikeResponse),
        (status = 400, response = BadRequestResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse),
        (status = 503, response = ServiceUnavailableResponse)
    )
)]
async fn like_listing<R: ListingRepository>(
    State(service): State<Arc<ListingService<R>>>,
    ObjectIdPath(id): ObjectIdPath,
    JsonOrEmpty(input): JsonOrEmpty<LikeRequest>,
) -> ListingResult<Json<LikeResponse>> {
    let like_count = service.like(id, input).await?;
    Ok(Json(LikeResponse {
        message: "Liked".to_string(),
        like_count,
    }))
}
