// Mock API module
// REST routes mirroring the real movie APIs, plus the GraphQL endpoints

//! # Mock API
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/movies/featured` | [`handlers::featured_movies`] |
//! | GET | `/movies/:slug` | [`handlers::movie_by_slug`] |
//! | GET | `/movies/:slug/stream` | [`handlers::movie_stream`] |
//! | GET | `/api/featured` | [`handlers::featured_with_upstream`] |
//! | GET | `/api/recommendations` | [`handlers::recommendations`] |
//! | POST | `/auth/validate` | [`handlers::validate_credentials`] |
//! | GET, POST | `/graphql` | [`handlers::graphql_operation`] |
//! | POST | `/review-service` | [`handlers::review_service`] |
//! | GET | `/health` | [`handlers::health_check`] |
//!
//! Every handler gets the same [`MockApiState`]: the fixture store, the delay
//! strategy, the upstream client and the GraphQL dispatcher.

pub mod handlers;
pub mod types;
pub mod upstream;

use axum::{
    routing::{get, post},
    Router,
};

pub use handlers::MockApiState;
pub use upstream::UpstreamClient;

use handlers::{
    featured_movies, featured_with_upstream, graphql_operation, health_check, movie_by_slug,
    movie_stream, not_found, recommendations, review_service, validate_credentials,
};

/// Build the mock routes over the given state
///
/// Layers (CORS, tracing) are added by the server, not here, so tests can drive
/// the bare router with `oneshot`.
pub fn create_router(state: MockApiState) -> Router {
    Router::new()
        // Movie catalog
        .route("/movies/featured", get(featured_movies))
        .route("/movies/:slug", get(movie_by_slug))
        .route("/movies/:slug/stream", get(movie_stream))
        // Web app API
        .route("/api/featured", get(featured_with_upstream))
        .route("/api/recommendations", get(recommendations))
        // Auth provider
        .route("/auth/validate", post(validate_credentials))
        // GraphQL
        .route("/graphql", get(graphql_operation).post(graphql_operation))
        .route("/review-service", post(review_service))
        // Health check
        .route("/health", get(health_check))
        // Fallback for unknown routes
        .fallback(not_found)
        .with_state(state)
}
