// Core domain models for the movie mocks
// Plain serde records shared by the REST routes and the GraphQL schema

// Declares the `movie` submodule from `movie.rs`
// Contains Movie, Review, User and the auth mock's user record
pub mod movie;

/// Re-export the catalog records
pub use movie::{AuthenticatedUser, Movie, Review, User};
