// GraphQL API for the movie mocks
// Schema, resolvers and the dispatcher that turns a document into { data, errors }

use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, PathSegment, Request,
    Schema, ServerError, SimpleObject, Variables, ID,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::engine::ids::ReviewIdGenerator;
use crate::engine::storage::MovieStorage;
use crate::models::{Movie, Review, User};
use crate::MockError;

// GraphQL types - these are the API representations of our domain models

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Movie")]
pub struct MovieGQL {
    pub id: ID,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub released_at: String,
    pub description: String,
    pub image_url: String,
    pub reviews: Vec<ReviewGQL>,
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Review")]
pub struct ReviewGQL {
    pub id: ID,
    pub text: String,
    pub rating: i32,
    pub author: UserGQL,
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "User")]
pub struct UserGQL {
    pub id: ID,
    pub first_name: String,
    pub avatar_url: String,
}

// Input types

#[derive(InputObject, Debug)]
pub struct UserInput {
    pub id: ID,
    pub first_name: String,
    pub avatar_url: String,
}

#[derive(InputObject, Debug)]
pub struct ReviewInput {
    pub movie_id: ID,
    pub text: String,
    pub rating: i32,
}

// Conversion implementations

impl From<&User> for UserGQL {
    fn from(user: &User) -> Self {
        Self {
            id: ID::from(user.id.as_str()),
            first_name: user.first_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl From<&Review> for ReviewGQL {
    fn from(review: &Review) -> Self {
        Self {
            id: ID::from(review.id.as_str()),
            text: review.text.clone(),
            rating: review.rating,
            author: UserGQL::from(&review.author),
        }
    }
}

impl From<&Movie> for MovieGQL {
    fn from(movie: &Movie) -> Self {
        Self {
            id: ID::from(movie.id.as_str()),
            title: movie.title.clone(),
            slug: movie.slug.clone(),
            category: movie.category.clone(),
            released_at: movie.released_at.clone(),
            description: movie.description.clone(),
            image_url: movie.image_url.clone(),
            reviews: movie.reviews.iter().map(ReviewGQL::from).collect(),
        }
    }
}

impl From<UserInput> for User {
    fn from(input: UserInput) -> Self {
        Self {
            id: input.id.to_string(),
            first_name: input.first_name,
            avatar_url: input.avatar_url,
        }
    }
}

impl MockError {
    /// Machine-readable code carried in GraphQL error extensions
    pub fn code(&self) -> &'static str {
        match self {
            MockError::NotFound(_) => "NOT_FOUND",
            MockError::Validation(_) => "VALIDATION_ERROR",
            MockError::SimulatedServerFailure(_) => "SIMULATED_SERVER_FAILURE",
            MockError::InvalidMovieId { .. } => "INVALID_MOVIE_ID",
            MockError::DuplicateFixture { .. } => "DUPLICATE_FIXTURE",
            MockError::Upstream(_) => "UPSTREAM_ERROR",
            MockError::Config(_) => "CONFIG_ERROR",
            MockError::Serialization(_) => "SERIALIZATION_ERROR",
            MockError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl ErrorExtensions for MockError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, e| e.set("code", self.code()))
    }
}

// GraphQL Query root
pub struct Query;

#[Object]
impl Query {
    /// Reviews of a movie; empty when the movie does not exist
    async fn reviews(
        &self,
        ctx: &Context<'_>,
        movie_id: ID,
    ) -> async_graphql::Result<Option<Vec<ReviewGQL>>> {
        let storage = ctx.data::<Arc<dyn MovieStorage>>()?;
        let reviews = storage.reviews(&movie_id).await;
        Ok(Some(reviews.iter().map(ReviewGQL::from).collect()))
    }

    /// Every movie in the catalog
    async fn movies(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<MovieGQL>> {
        let storage = ctx.data::<Arc<dyn MovieStorage>>()?;
        Ok(storage.all().await.iter().map(MovieGQL::from).collect())
    }

    /// A movie by slug
    async fn movie(
        &self,
        ctx: &Context<'_>,
        slug: String,
    ) -> async_graphql::Result<Option<MovieGQL>> {
        let storage = ctx.data::<Arc<dyn MovieStorage>>()?;
        Ok(storage.find_by_slug(&slug).await.as_ref().map(MovieGQL::from))
    }
}

// GraphQL Mutation root
pub struct Mutation;

#[Object]
impl Mutation {
    /// Append a review to a movie and return it
    async fn add_review(
        &self,
        ctx: &Context<'_>,
        author: UserInput,
        review_input: ReviewInput,
    ) -> async_graphql::Result<Option<ReviewGQL>> {
        let storage = ctx.data::<Arc<dyn MovieStorage>>()?;
        let ids = ctx.data::<Arc<dyn ReviewIdGenerator>>()?;

        let ReviewInput {
            movie_id,
            text,
            rating,
        } = review_input;
        let movie_id = movie_id.to_string();

        if storage.find_by_id(&movie_id).await.is_none() {
            warn!("addReview rejected: no movie {}", movie_id);
            ctx.add_error(field_error(ctx, MockError::InvalidMovieId { movie_id }));
            return Ok(None);
        }

        let review = Review {
            id: ids.next_id(),
            text,
            rating,
            author: author.into(),
        };

        let appended = storage.append_review(&movie_id, review).await;
        let created = match appended {
            Ok(created) => created,
            Err(MockError::NotFound(_)) => {
                ctx.add_error(field_error(ctx, MockError::InvalidMovieId { movie_id }));
                return Ok(None);
            }
            Err(other) => return Err(other.extend()),
        };

        debug!("Added review {} to movie {}", created.id, movie_id);
        Ok(Some(ReviewGQL::from(&created)))
    }
}

/// Error attached to the current field so the field, not the whole `data`, becomes null
fn field_error(ctx: &Context<'_>, error: MockError) -> ServerError {
    let mut server_error = error.extend().into_server_error(ctx.item.pos);
    server_error.path = vec![PathSegment::Field(
        ctx.item.node.response_key().node.to_string(),
    )];
    server_error
}

// Schema type alias
pub type MovieMocksSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create the schema with the store and id generator as context data
pub fn create_schema_with_storage(
    storage: Arc<dyn MovieStorage>,
    ids: Arc<dyn ReviewIdGenerator>,
) -> MovieMocksSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(storage)
        .data(ids)
        .finish()
}

/// Execution result in the shape the client reads: `{ data, errors }`
///
/// `errors` is left out of the JSON when execution produced none.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLEnvelope {
    pub data: serde_json::Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServerError>,
}

impl GraphQLEnvelope {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages of every error entry, in order
    pub fn error_messages(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.message.as_str()).collect()
    }
}

impl From<async_graphql::Response> for GraphQLEnvelope {
    fn from(response: async_graphql::Response) -> Self {
        Self {
            data: response.data.into_json().unwrap_or(serde_json::Value::Null),
            errors: response.errors,
        }
    }
}

/// Executes intercepted GraphQL documents against the mock schema
///
/// The result is passed through untouched: no retries, no caching, no rewriting
/// of `data` or `errors`.
#[derive(Clone)]
pub struct GraphQLDispatcher {
    schema: MovieMocksSchema,
}

impl GraphQLDispatcher {
    pub fn new(schema: MovieMocksSchema) -> Self {
        Self { schema }
    }

    pub fn with_storage(storage: Arc<dyn MovieStorage>, ids: Arc<dyn ReviewIdGenerator>) -> Self {
        Self::new(create_schema_with_storage(storage, ids))
    }

    pub fn schema(&self) -> &MovieMocksSchema {
        &self.schema
    }

    pub async fn dispatch(&self, request: Request) -> GraphQLEnvelope {
        debug!(
            "Dispatching GraphQL operation {:?}",
            request.operation_name.as_deref().unwrap_or("<anonymous>")
        );
        self.schema.execute(request).await.into()
    }

    /// Convenience wrapper taking a document and JSON variables
    pub async fn execute_document(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> GraphQLEnvelope {
        let request = Request::new(query).variables(Variables::from_json(variables));
        self.dispatch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fixtures::seed_movies;
    use crate::engine::ids::SequentialIds;
    use crate::engine::storage::InMemoryMovieStore;
    use serde_json::json;

    const ADD_REVIEW: &str = r#"
        mutation AddReview($author: UserInput!, $reviewInput: ReviewInput!) {
            addReview(author: $author, reviewInput: $reviewInput) {
                id
                text
                rating
                author { id firstName avatarUrl }
            }
        }
    "#;

    const REVIEWS: &str = r#"
        query Reviews($movieId: ID!) {
            reviews(movieId: $movieId) { id text rating author { id firstName avatarUrl } }
        }
    "#;

    fn setup() -> (Arc<dyn MovieStorage>, GraphQLDispatcher) {
        let storage: Arc<dyn MovieStorage> =
            Arc::new(InMemoryMovieStore::new(seed_movies()).unwrap());
        let ids: Arc<dyn ReviewIdGenerator> = Arc::new(SequentialIds::new("review"));
        let dispatcher = GraphQLDispatcher::with_storage(storage.clone(), ids);
        (storage, dispatcher)
    }

    fn add_review_vars(movie_id: &str) -> serde_json::Value {
        json!({
            "author": {
                "id": "user-7",
                "firstName": "Ellen",
                "avatarUrl": "https://i.pravatar.cc/100?img=7"
            },
            "reviewInput": {
                "movieId": movie_id,
                "text": "Watched it twice.",
                "rating": 4
            }
        })
    }

    #[test]
    fn test_schema_contract() {
        let (_, dispatcher) = setup();
        let sdl = dispatcher.schema().sdl();

        assert!(sdl.contains("reviews(movieId: ID!): [Review!]"));
        assert!(sdl.contains("addReview(author: UserInput!, reviewInput: ReviewInput!): Review"));
        assert!(sdl.contains("type Movie"));
        assert!(sdl.contains("input ReviewInput"));
    }

    #[tokio::test]
    async fn test_reviews_for_unknown_movie_is_empty() {
        let (_, dispatcher) = setup();

        let result = dispatcher
            .execute_document(REVIEWS, json!({ "movieId": "nope" }))
            .await;

        assert!(result.is_ok());
        assert_eq!(result.data, json!({ "reviews": [] }));
    }

    #[tokio::test]
    async fn test_reviews_returns_seeded_reviews() {
        let (storage, dispatcher) = setup();
        let movie = storage.find_by_slug("spirited-away").await.unwrap();

        let result = dispatcher
            .execute_document(REVIEWS, json!({ "movieId": movie.id }))
            .await;

        let reviews = result.data["reviews"].as_array().unwrap();
        assert_eq!(reviews.len(), movie.reviews.len());
        assert_eq!(reviews[0]["author"]["firstName"], "Kenji");
    }

    #[tokio::test]
    async fn test_add_review_grows_reviews_by_one() {
        let (storage, dispatcher) = setup();
        let movie = storage.find_by_slug("the-matrix").await.unwrap();

        let before = dispatcher
            .execute_document(REVIEWS, json!({ "movieId": movie.id }))
            .await;
        let before_len = before.data["reviews"].as_array().unwrap().len();

        let added = dispatcher
            .execute_document(ADD_REVIEW, add_review_vars(&movie.id))
            .await;
        assert!(added.is_ok(), "unexpected errors: {:?}", added.error_messages());
        let created = added.data["addReview"].clone();
        assert_eq!(created["id"], "review-1");
        assert_eq!(created["author"]["firstName"], "Ellen");

        let after = dispatcher
            .execute_document(REVIEWS, json!({ "movieId": movie.id }))
            .await;
        let reviews = after.data["reviews"].as_array().unwrap();
        assert_eq!(reviews.len(), before_len + 1);
        assert_eq!(reviews.last().unwrap(), &created);
    }

    #[tokio::test]
    async fn test_add_review_unknown_movie_is_structured_error() {
        let (storage, dispatcher) = setup();
        let before = storage.all().await;

        let result = dispatcher
            .execute_document(ADD_REVIEW, add_review_vars("not-a-movie"))
            .await;

        assert_eq!(result.data, json!({ "addReview": null }));
        assert_eq!(result.error_messages(), vec!["Invalid movie id"]);
        let error = serde_json::to_value(&result.errors[0]).unwrap();
        assert_eq!(error["extensions"]["code"], "INVALID_MOVIE_ID");
        assert_eq!(error["path"], json!(["addReview"]));

        assert_eq!(storage.all().await, before);
    }

    #[tokio::test]
    async fn test_rejected_review_does_not_consume_an_id() {
        let (storage, dispatcher) = setup();
        let movie = storage.find_by_slug("arrival").await.unwrap();

        dispatcher
            .execute_document(ADD_REVIEW, add_review_vars("missing"))
            .await;
        let added = dispatcher
            .execute_document(ADD_REVIEW, add_review_vars(&movie.id))
            .await;

        assert_eq!(added.data["addReview"]["id"], "review-1");
    }

    #[tokio::test]
    async fn test_movie_query_includes_reviews() {
        let (_, dispatcher) = setup();

        let result = dispatcher
            .execute_document(
                r#"{ movie(slug: "the-lord-of-the-rings") { title releasedAt reviews { rating } } }"#,
                json!({}),
            )
            .await;

        assert_eq!(result.data["movie"]["title"], "The Lord of the Rings");
        assert_eq!(result.data["movie"]["reviews"], json!([{ "rating": 5 }]));
    }

    #[tokio::test]
    async fn test_invalid_document_passes_errors_through() {
        let (_, dispatcher) = setup();

        let result = dispatcher.execute_document("{ reviews { id ", json!({})).await;

        assert!(!result.is_ok());
        assert_eq!(result.data, serde_json::Value::Null);
    }

    #[test]
    fn test_envelope_omits_empty_errors() {
        let envelope = GraphQLEnvelope {
            data: json!({ "reviews": [] }),
            errors: vec![],
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "data": { "reviews": [] } })
        );
    }
}
