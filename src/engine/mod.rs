// Movie Mocks Engine
// Fixture store, GraphQL schema and the injectable behavior knobs

//! # Engine Module
//!
//! Everything the HTTP layer needs to compute a response lives here. None of it
//! knows about axum; handlers in [`crate::api`] pull these pieces out of shared
//! state and call into them.

/// GraphQL schema and dispatch
///
/// Contains:
/// - Output types (`MovieGQL`, `ReviewGQL`, `UserGQL`)
/// - Input types (`UserInput`, `ReviewInput`)
/// - Query and Mutation resolvers against the fixture store
/// - `GraphQLDispatcher`, which executes a document and returns `{ data, errors }`
pub mod graphql;

/// Storage abstraction layer
///
/// Contains:
/// - `MovieStorage` trait
/// - `InMemoryMovieStore`, seeded once and mutated only by add-review
pub mod storage;

/// Seed catalog and sentinel ids
pub mod fixtures;

/// Latency injection
///
/// Contains:
/// - `DelayMode`: none, fixed, realistic, never-resolving
/// - `DelayStrategy`: default mode plus per-scenario overrides
pub mod delay;

/// Review id generation
pub mod ids;

pub use delay::{DelayMode, DelayStrategy};
pub use graphql::{create_schema_with_storage, GraphQLDispatcher, GraphQLEnvelope, MovieMocksSchema};
pub use ids::{RandomHexIds, ReviewIdGenerator, SequentialIds, UuidIds};
pub use storage::{InMemoryMovieStore, MovieStorage};
