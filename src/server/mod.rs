// Movie Mocks Server
// Exposes the mock routes and the GraphQL endpoint over HTTP

//! # Server Module
//!
//! The server layer sits on top of the API and engine layers:
//! ```text
//! Web client (dev / test)
//!        ↓ HTTP
//! Server Layer (this module) ← router assembly, CORS, request tracing
//!        ↓
//! API Layer ← REST handlers, GraphQL HTTP adapter
//!        ↓
//! Engine Layer ← fixture store, schema, delays, ids
//! ```

/// Mock server and its builder
///
/// Contains:
/// - `MockServer`: owns the shared state and serves the router
/// - `MockServerBuilder`: step-by-step configuration with defaults
/// - GraphiQL page at `/`
pub mod mock_server;

pub use mock_server::{MockServer, MockServerBuilder, MockServerSettings};
