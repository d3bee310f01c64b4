//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roommate Finder API",
        version = "0.1.0",
        description = "Roommate listings backed by MongoDB"
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    nest(
        (path = "/listings", api = domain_listings::ApiDoc)
    ),
    tags(
        (name = "Listings", description = "Roommate listing endpoints (MongoDB)")
    )
)]
pub struct ApiDoc;
