// Movie Mocks - Rust Edition
// Deterministic REST and GraphQL mock server for the movie-browsing client

//! # Movie Mocks Library
//!
//! This is the library crate behind the `server` binary. It stands in for the
//! real movie APIs during development and testing: the client is pointed at this
//! server and gets canned or computed responses back, including simulated latency,
//! simulated failures, and a small in-memory review store that GraphQL mutations
//! write to.
//!
//! ## Core Components
//!
//! ### Domain Models
//! - [`Movie`]: A catalog entry, addressable by id and by slug
//! - [`Review`]: An immutable review appended to a movie
//! - [`User`]: The review author as supplied by the caller
//!
//! ### Engine
//! - [`MovieStorage`] / [`InMemoryMovieStore`]: The fixture store
//! - [`DelayStrategy`]: Latency injection for "fast" and "slow network" modes
//! - [`ReviewIdGenerator`]: Injectable id provider for new reviews
//! - [`GraphQLDispatcher`]: Executes GraphQL documents against the mock schema
//!
//! ### Server
//! - [`MockServerBuilder`]: Assembles the REST routes, the GraphQL endpoint and
//!   the shared state into one axum router
//!
//! **Usage Example:**
//! ```rust,no_run
//! use movie_mocks::{DelayStrategy, MockServerBuilder};
//!
//! # async fn run() -> movie_mocks::Result<()> {
//! MockServerBuilder::new()
//!     .with_port(4000)
//!     .with_delay(DelayStrategy::instant())
//!     .build_and_run()
//!     .await
//! # }
//! ```
//!
//! ## Rust Learning Notes:
//!
//! The crate follows a layered layout:
//! ```text
//! server  (router assembly, CORS, tracing)
//!   ↓
//! api     (REST handlers, GraphQL HTTP adapter, upstream client)
//!   ↓
//! engine  (GraphQL schema + resolvers, store, delays, ids)
//!   ↓
//! models  (plain serde data types)
//! ```

// Core domain models
pub mod models;

// Fixture store, GraphQL schema, delay and id injection
pub mod engine;

// REST route handlers and the HTTP side of the GraphQL adapter
pub mod api;

// Router assembly and server startup
pub mod server;

// Layered file + environment configuration
pub mod config;

// Re-export core domain types for easy access
pub use models::{AuthenticatedUser, Movie, Review, User};

// Re-export engine types for convenience
pub use engine::{
    delay::{DelayMode, DelayStrategy},
    fixtures::{seed_movies, FAILING_RECOMMENDATIONS_MOVIE_ID},
    graphql::{create_schema_with_storage, GraphQLDispatcher, GraphQLEnvelope, MovieMocksSchema},
    ids::{RandomHexIds, ReviewIdGenerator, SequentialIds, UuidIds},
    storage::{InMemoryMovieStore, MovieStorage},
};

// Re-export server types for convenience
pub use crate::config::MockServerConfig;
pub use server::{MockServer, MockServerBuilder};

use thiserror::Error;

/// Error kinds for the mock server
///
/// ## Rust Learning Notes:
///
/// ### The `thiserror` Crate
/// - `#[derive(Error)]` implements `std::error::Error`
/// - `#[error("...")]` provides the display message
/// - `#[from]` enables automatic conversion with `?`
#[derive(Error, Debug)]
pub enum MockError {
    /// Unknown slug or movie id
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required request field was missing
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Failure deliberately triggered by a sentinel value
    #[error("Simulated server failure for {0}")]
    SimulatedServerFailure(String),

    /// Add-review against a movie that is not in the store
    #[error("Invalid movie id")]
    InvalidMovieId { movie_id: String },

    /// Two fixtures share an id or a slug
    #[error("Duplicate fixture {field}: {value}")]
    DuplicateFixture { field: &'static str, value: String },

    /// The upstream service behind a pass-through route failed
    #[error("Upstream error: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for MockError {
    fn from(err: std::io::Error) -> Self {
        MockError::Internal(err.to_string())
    }
}

/// Type alias for Results that use our custom error type
pub type Result<T> = std::result::Result<T, MockError>;
