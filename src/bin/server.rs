// Movie Mocks - Server binary
// Run with: cargo run --bin server -- --delay none

//! # Movie Mocks Server Binary
//!
//! Starts the mock server the web client talks to in development and tests.
//!
//! Configuration is layered, later layers winning:
//! 1. Built-in defaults
//! 2. `movie-mocks.toml` in the working directory, or the file given by `--config`
//! 3. `MOVIE_MOCKS_*` environment variables (a `.env` file is loaded first)
//! 4. Command-line flags
//!
//! ## Usage Examples
//!
//! - `server` - simulated slow network on port 4000
//! - `server --delay none --id-generator sequential` - fast and deterministic, for tests
//! - `server --delay infinite` - every delayed route hangs forever

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use movie_mocks::{MockServerBuilder, MockServerConfig};

#[derive(Parser)]
#[command(name = "movie-mocks")]
#[command(about = "Deterministic REST and GraphQL mocks for the movie client")]
#[command(version)]
struct Cli {
    /// Config file (TOML)
    #[arg(long, env = "MOVIE_MOCKS_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to listen on
    #[arg(long, env = "MOVIE_MOCKS_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MOVIE_MOCKS_PORT")]
    port: Option<u16>,

    /// Delay mode: none, realistic, infinite, or milliseconds
    #[arg(long, env = "MOVIE_MOCKS_DELAY")]
    delay: Option<String>,

    /// Review id generator: uuid, sequential or random
    #[arg(long, env = "MOVIE_MOCKS_ID_GENERATOR")]
    id_generator: Option<String>,

    /// Upstream featured list prepended on /api/featured
    #[arg(long, env = "MOVIE_MOCKS_FEATURED_UPSTREAM_URL")]
    featured_upstream: Option<String>,

    /// Disable CORS headers
    #[arg(long, env = "MOVIE_MOCKS_NO_CORS")]
    no_cors: bool,

    /// Enable verbose logging
    #[arg(short, long, env = "MOVIE_MOCKS_VERBOSE")]
    verbose: bool,
}

impl Cli {
    fn apply(self, mut config: MockServerConfig) -> MockServerConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(delay) = self.delay {
            config.delay = delay;
        }
        if let Some(id_generator) = self.id_generator {
            config.id_generator = id_generator;
        }
        if let Some(url) = self.featured_upstream {
            config.featured_upstream_url = Some(url);
        }
        if self.no_cors {
            config.cors_enabled = false;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv_result = dotenv();

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = dotenv_result {
        warn!("No .env file loaded: {}", e);
    }

    info!("🚀 Starting Movie Mocks Server...");

    let config = MockServerConfig::load(cli.config.as_deref())
        .context("failed to load configuration")?;
    let config = cli.apply(config);
    config.validate().context("invalid configuration")?;

    MockServerBuilder::from_config(&config)
        .context("failed to configure server")?
        .build_and_run()
        .await
        .context("server stopped")?;

    Ok(())
}
