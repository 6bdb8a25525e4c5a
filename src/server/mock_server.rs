// Mock server assembly
// Wires the store, delay strategy, id generator and upstream client into one router

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router, Server,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::api::{create_router, MockApiState, UpstreamClient};
use crate::config::MockServerConfig;
use crate::engine::{
    delay::DelayStrategy,
    ids::{ReviewIdGenerator, UuidIds},
    storage::{InMemoryMovieStore, MovieStorage},
};
use crate::{MockError, Result};

#[derive(Clone, Debug)]
pub struct MockServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_enabled: bool,
}

impl Default for MockServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
            cors_enabled: true,
        }
    }
}

pub struct MockServer {
    settings: MockServerSettings,
    state: MockApiState,
}

impl MockServer {
    pub fn state(&self) -> &MockApiState {
        &self.state
    }

    pub fn settings(&self) -> &MockServerSettings {
        &self.settings
    }

    /// Full router: mock routes, GraphiQL page, request tracing and CORS
    pub fn router(&self) -> Router {
        let mut app = create_router(self.state.clone())
            .route("/", get(graphiql))
            .layer(TraceLayer::new_for_http());

        if self.settings.cors_enabled {
            app = app.layer(CorsLayer::permissive());
        }

        app
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.settings.host, self.settings.port)
            .parse()
            .map_err(|e| MockError::Validation(format!("invalid listen address: {}", e)))
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.socket_addr()?;
        let app = self.router();

        info!("🚀 Movie mock server running on http://{}", addr);
        info!("📊 GraphiQL interface: http://{}/", addr);
        info!("🔗 GraphQL endpoint: http://{}/graphql", addr);
        info!("🎞️  Featured movies: http://{}/movies/featured", addr);
        info!("🧪 Recommendations: http://{}/api/recommendations?movieId=...", addr);
        info!("📋 Configuration:");
        info!("   CORS enabled: {}", self.settings.cors_enabled);
        info!("   Default delay: {}", self.state.delay.default_mode());
        info!("   Video upstream: {}", self.state.upstream.video_url());
        if let Some(url) = self.state.upstream.featured_url() {
            info!("   Featured upstream: {}", url);
        }

        Server::try_bind(&addr)
            .map_err(|e| MockError::Internal(format!("cannot bind {}: {}", addr, e)))?
            .serve(app.into_make_service())
            .await
            .map_err(|e| MockError::Internal(format!("server error: {}", e)))
    }
}

pub struct MockServerBuilder {
    settings: MockServerSettings,
    store: Option<Arc<dyn MovieStorage>>,
    ids: Arc<dyn ReviewIdGenerator>,
    delay: DelayStrategy,
    upstream: Option<UpstreamClient>,
}

impl MockServerBuilder {
    pub fn new() -> Self {
        Self {
            settings: MockServerSettings::default(),
            store: None,
            ids: Arc::new(UuidIds),
            delay: DelayStrategy::simulated(),
            upstream: None,
        }
    }

    /// Start from loaded configuration
    pub fn from_config(config: &MockServerConfig) -> Result<Self> {
        Ok(Self::new()
            .with_host(config.host.clone())
            .with_port(config.port)
            .with_cors(config.cors_enabled)
            .with_delay(config.delay_strategy()?)
            .with_id_generator(config.id_generator()?)
            .with_upstream(config.upstream_client()?))
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.settings.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.settings.port = port;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.settings.cors_enabled = enabled;
        self
    }

    pub fn with_storage(mut self, store: Arc<dyn MovieStorage>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn ReviewIdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_delay(mut self, delay: DelayStrategy) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_upstream(mut self, upstream: UpstreamClient) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Seeds the default catalog and the demo upstream when none were supplied
    pub fn build(self) -> Result<MockServer> {
        let store = match self.store {
            Some(store) => store,
            None => Arc::new(InMemoryMovieStore::with_fixtures()?) as Arc<dyn MovieStorage>,
        };
        let upstream = match self.upstream {
            Some(upstream) => upstream,
            None => UpstreamClient::demo()?,
        };

        Ok(MockServer {
            settings: self.settings,
            state: MockApiState::new(store, self.ids, self.delay, upstream),
        })
    }

    pub async fn build_and_run(self) -> Result<()> {
        self.build()?.run().await
    }
}

impl Default for MockServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// GraphiQL interface
async fn graphiql() -> impl IntoResponse {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="robots" content="noindex">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Movie Mocks GraphiQL</title>
    <style>
      body {
        height: 100%;
        margin: 0;
        width: 100%;
        overflow: hidden;
      }
      #graphiql {
        height: 100vh;
      }
    </style>
    <script crossorigin src="https://unpkg.com/react@18/umd/react.development.js"></script>
    <script crossorigin src="https://unpkg.com/react-dom@18/umd/react-dom.development.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/graphiql@3/graphiql.min.css" />
  </head>
  <body>
    <div id="graphiql">Loading...</div>
    <script src="https://unpkg.com/graphiql@3/graphiql.min.js" type="application/javascript"></script>
    <script>
      const root = ReactDOM.createRoot(document.getElementById('graphiql'));
      const fetcher = GraphiQL.createFetcher({ url: '/graphql' });
      root.render(React.createElement(GraphiQL, {
        fetcher: fetcher,
        defaultEditorToolsVisibility: true,
      }));
    </script>
  </body>
</html>
"#)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ids::SequentialIds;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_server() -> MockServer {
        MockServerBuilder::new()
            .with_port(0)
            .with_delay(DelayStrategy::instant())
            .with_id_generator(Arc::new(SequentialIds::default()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_pattern() {
        let server = MockServerBuilder::new()
            .with_host("127.0.0.1")
            .with_port(8080)
            .with_cors(false)
            .build()
            .unwrap();

        assert_eq!(server.settings().port, 8080);
        assert!(!server.settings().cors_enabled);
        assert_eq!(
            server.socket_addr().unwrap(),
            "127.0.0.1:8080".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn test_invalid_host_is_rejected() {
        let server = MockServerBuilder::new()
            .with_host("not a host")
            .build()
            .unwrap();
        assert!(matches!(server.socket_addr(), Err(MockError::Validation(_))));
    }

    #[tokio::test]
    async fn test_builder_seeds_default_catalog() {
        let server = test_server();
        assert_eq!(server.state().store.all().await.len(), 5);
    }

    #[tokio::test]
    async fn test_graphiql_page_served_at_root() {
        let response = test_server()
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_preflight_allowed() {
        let response = test_server()
            .router()
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/graphql")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(response
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
