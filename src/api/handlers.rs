// Mock REST route handlers
// One async handler per mocked endpoint, plus the HTTP side of the GraphQL adapter

use std::sync::Arc;

use async_graphql::parser::parse_query;
use async_graphql_axum::GraphQLRequest;
use axum::{
    body::{Body, StreamBody},
    extract::{Form, FromRequest, Multipart, Path, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use futures::StreamExt;
use tracing::{debug, error, info, warn};

use super::types::{
    current_timestamp, AuthValidateForm, ErrorBody, HealthResponse, RecommendationsQuery,
    ServiceGraphQLRequest, ServiceGraphQLResponse, ServiceReview, MISSING_MOVIE_ID_MESSAGE,
};
use super::upstream::UpstreamClient;
use crate::engine::delay::{DelayStrategy, RECOMMENDATIONS, STREAM_CHUNK};
use crate::engine::fixtures::{
    AUTH_USER_AVATAR_URL, AUTH_USER_FIRST_NAME, AUTH_USER_ID, AUTH_USER_LAST_NAME,
    FAILING_RECOMMENDATIONS_MOVIE_ID,
};
use crate::engine::graphql::{GraphQLDispatcher, GraphQLEnvelope};
use crate::engine::ids::ReviewIdGenerator;
use crate::engine::storage::MovieStorage;
use crate::models::{AuthenticatedUser, Movie};
use crate::MockError;

/// Operation answered by the review service link
pub const LIST_REVIEWS_OPERATION: &str = "ListReviews";

/// Shared state handed to every handler
///
/// Everything is behind `Arc`, so cloning the state per request is cheap.
#[derive(Clone)]
pub struct MockApiState {
    pub store: Arc<dyn MovieStorage>,
    pub delay: Arc<DelayStrategy>,
    pub upstream: Arc<UpstreamClient>,
    pub dispatcher: GraphQLDispatcher,
}

impl MockApiState {
    pub fn new(
        store: Arc<dyn MovieStorage>,
        ids: Arc<dyn ReviewIdGenerator>,
        delay: DelayStrategy,
        upstream: UpstreamClient,
    ) -> Self {
        let dispatcher = GraphQLDispatcher::with_storage(store.clone(), ids);
        Self {
            store,
            delay: Arc::new(delay),
            upstream: Arc::new(upstream),
            dispatcher,
        }
    }
}

pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "movie-mocks".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: current_timestamp(),
    })
}

/// `GET /movies/:slug/stream`
///
/// Proxies the demo video and holds every chunk back by the `stream_chunk` delay.
pub async fn movie_stream(
    State(state): State<MockApiState>,
    Path(slug): Path<String>,
) -> Result<Response, MockError> {
    info!("🎬 Streaming demo video for {}", slug);

    let upstream = state.upstream.open_video_stream().await?;
    let status = upstream.status();

    let mut headers = HeaderMap::new();
    for name in [header::CONTENT_TYPE, header::CONTENT_LENGTH, header::ACCEPT_RANGES] {
        if let Some(value) = upstream.headers().get(&name) {
            headers.insert(name, value.clone());
        }
    }

    let delay = state.delay.clone();
    let body = upstream.bytes_stream().then(move |chunk: reqwest::Result<Bytes>| {
        let delay = delay.clone();
        async move {
            delay.wait(STREAM_CHUNK).await;
            chunk
        }
    });

    Ok((status, headers, StreamBody::new(body)).into_response())
}

/// `GET /movies/featured`
pub async fn featured_movies(State(state): State<MockApiState>) -> Json<Vec<Movie>> {
    Json(state.store.all().await)
}

/// `GET /api/featured`
///
/// Upstream items first, then every fixture movie.
pub async fn featured_with_upstream(
    State(state): State<MockApiState>,
) -> Result<Json<Vec<serde_json::Value>>, MockError> {
    let mut items = state.upstream.fetch_featured().await?;
    let upstream_count = items.len();

    for movie in state.store.all().await {
        items.push(serde_json::to_value(movie)?);
    }

    debug!(
        "Composed featured list: {} upstream + {} fixture",
        upstream_count,
        items.len() - upstream_count
    );
    Ok(Json(items))
}

/// `GET /movies/:slug`
pub async fn movie_by_slug(
    State(state): State<MockApiState>,
    Path(slug): Path<String>,
) -> Response {
    match state.store.find_by_slug(&slug).await {
        Some(movie) => Json(movie).into_response(),
        None => {
            debug!("No movie with slug {}", slug);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

/// `GET /api/recommendations?movieId=`
///
/// Every other movie in the catalog; the sentinel id fails with an empty 500.
pub async fn recommendations(
    State(state): State<MockApiState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Response {
    state.delay.wait(RECOMMENDATIONS).await;

    let params = RecommendationsQuery::from_pairs(&pairs);
    let Some(movie_id) = params.movie_id() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(MISSING_MOVIE_ID_MESSAGE)),
        )
            .into_response();
    };

    if movie_id == FAILING_RECOMMENDATIONS_MOVIE_ID {
        return MockError::SimulatedServerFailure(movie_id.to_string()).into_response();
    }

    let recommendations: Vec<Movie> = state
        .store
        .all()
        .await
        .into_iter()
        .filter(|movie| movie.id != movie_id)
        .collect();

    Json(recommendations).into_response()
}

/// `POST /auth/validate`
///
/// Any non-empty email/password pair is accepted, sent either url-encoded or as
/// `multipart/form-data`. A body that is not a valid form counts as missing fields.
pub async fn validate_credentials(request: Request<Body>) -> Response {
    let form = read_credentials(request).await;

    let Some(email) = form.credentials_email() else {
        return (StatusCode::BAD_REQUEST, "").into_response();
    };

    info!("🔑 Accepting mock credentials for {}", email);
    Json(AuthenticatedUser {
        id: AUTH_USER_ID.to_string(),
        email: email.to_string(),
        first_name: AUTH_USER_FIRST_NAME.to_string(),
        last_name: AUTH_USER_LAST_NAME.to_string(),
        avatar_url: AUTH_USER_AVATAR_URL.to_string(),
    })
    .into_response()
}

async fn read_credentials(request: Request<Body>) -> AuthValidateForm {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        return match Form::<AuthValidateForm>::from_request(request, &()).await {
            Ok(Form(form)) => form,
            Err(rejection) => {
                debug!("Credentials body is not a form: {}", rejection);
                AuthValidateForm::default()
            }
        };
    }

    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(rejection) => {
            debug!("Credentials body is not multipart: {}", rejection);
            return AuthValidateForm::default();
        }
    };

    let mut pairs = Vec::new();
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                match field.text().await {
                    Ok(value) => pairs.push((name, value)),
                    Err(e) => {
                        debug!("Unreadable multipart field {}: {}", name, e);
                        return AuthValidateForm::default();
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                debug!("Malformed multipart credentials: {}", e);
                return AuthValidateForm::default();
            }
        }
    }

    AuthValidateForm::from_pairs(&pairs)
}

/// `GET|POST /graphql`
///
/// Executes any operation against the mock schema and returns `{ data, errors }`.
pub async fn graphql_operation(
    State(state): State<MockApiState>,
    request: GraphQLRequest,
) -> Json<GraphQLEnvelope> {
    Json(state.dispatcher.dispatch(request.into_inner()).await)
}

/// `POST /review-service`
///
/// Canned answer for the `ListReviews` operation of the review service.
pub async fn review_service(Json(request): Json<ServiceGraphQLRequest>) -> Response {
    let operation = request
        .operation_name
        .clone()
        .or_else(|| operation_name_from_document(&request.query));

    match operation.as_deref() {
        Some(LIST_REVIEWS_OPERATION) => Json(ServiceGraphQLResponse::data(vec![ServiceReview {
            id: "4569870f-f0d6-4187-843f-a25aadf948eb8061539f-f0d6-4187-843f-a25aadf948eb"
                .to_string(),
            message: "Hello World".to_string(),
        }]))
        .into_response(),
        other => {
            let name = other.unwrap_or("<anonymous>");
            warn!("Review service has no handler for operation {}", name);
            (
                StatusCode::BAD_REQUEST,
                Json(ServiceGraphQLResponse::error(format!(
                    "Unhandled operation \"{}\"",
                    name
                ))),
            )
                .into_response()
        }
    }
}

/// Name of the first named operation in a GraphQL document
fn operation_name_from_document(query: &str) -> Option<String> {
    let document = parse_query(query).ok()?;
    document
        .operations
        .iter()
        .find_map(|(name, _)| name.map(|name| name.to_string()))
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new("Route not found")))
}

/// REST-side mapping of errors that escape a handler
impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        if let MockError::SimulatedServerFailure(target) = &self {
            warn!("💥 Simulated server failure for {}", target);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }

        let status = match &self {
            MockError::NotFound(_) => StatusCode::NOT_FOUND,
            MockError::Validation(_) | MockError::InvalidMovieId { .. } => StatusCode::BAD_REQUEST,
            MockError::Upstream(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Request failed: {}", self);
        }

        (status, Json(ErrorBody::new(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_operation_name_from_document() {
        assert_eq!(
            operation_name_from_document("query ListReviews { serviceReviews { id } }"),
            Some("ListReviews".to_string())
        );
        assert_eq!(operation_name_from_document("{ serviceReviews { id } }"), None);
        assert_eq!(operation_name_from_document("not graphql {"), None);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(
            MockError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MockError::Validation("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            MockError::Internal("x".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_simulated_failure_has_empty_body() {
        let response = MockError::SimulatedServerFailure("m-1".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert!(body.is_empty());
    }
}
