// Layered configuration for the mock server
// Optional TOML file, then MOVIE_MOCKS_* environment variables

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use ::config::{builder::DefaultState, Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::UpstreamClient;
use crate::engine::delay::{
    DelayMode, DelayStrategy, RECOMMENDATIONS, STREAM_CHUNK, STREAM_CHUNK_DELAY,
};
use crate::engine::fixtures::DEMO_VIDEO_URL;
use crate::engine::ids::{generator_from_name, ReviewIdGenerator};
use crate::{MockError, Result};

/// Name of the optional config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "movie-mocks";

/// Prefix of the environment overrides, e.g. `MOVIE_MOCKS_PORT=4100`
pub const ENV_PREFIX: &str = "MOVIE_MOCKS";

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_true() -> bool {
    true
}

fn default_delay() -> String {
    "realistic".to_string()
}

fn default_stream_chunk_delay_ms() -> u64 {
    STREAM_CHUNK_DELAY.as_millis() as u64
}

fn default_id_generator() -> String {
    "uuid".to_string()
}

fn default_video_url() -> String {
    DEMO_VIDEO_URL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockServerConfig {
    /// Interface to listen on
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// `none`, `realistic`, `infinite`, or milliseconds
    ///
    /// `none` turns every delay off, including the per-chunk stream delay.
    #[serde(default = "default_delay")]
    pub delay: String,

    #[serde(default = "default_stream_chunk_delay_ms")]
    pub stream_chunk_delay_ms: u64,

    /// `uuid`, `sequential` or `random`
    #[serde(default = "default_id_generator")]
    pub id_generator: String,

    #[serde(default = "default_video_url")]
    pub video_url: String,

    /// Real featured list to prepend on `/api/featured`
    #[serde(default)]
    pub featured_upstream_url: Option<String>,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            delay: default_delay(),
            stream_chunk_delay_ms: default_stream_chunk_delay_ms(),
            id_generator: default_id_generator(),
            video_url: default_video_url(),
            featured_upstream_url: None,
        }
    }
}

impl MockServerConfig {
    /// Load from `path` (or `movie-mocks.*` if present) and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = Config::builder().add_source(file).add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder.build()?.try_deserialize::<MockServerConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value can be turned into a running server
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        self.delay_strategy()?;
        self.id_generator()?;
        parse_url("video_url", &self.video_url)?;
        if let Some(url) = &self.featured_upstream_url {
            parse_url("featured_upstream_url", url)?;
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().map_err(|e| {
            MockError::Validation(format!(
                "{}:{} is not a valid socket address: {}",
                self.host, self.port, e
            ))
        })
    }

    pub fn delay_strategy(&self) -> Result<DelayStrategy> {
        let mode: DelayMode = self.delay.parse()?;
        if mode == DelayMode::None {
            return Ok(DelayStrategy::instant());
        }

        let chunk = DelayMode::Fixed(std::time::Duration::from_millis(
            self.stream_chunk_delay_ms,
        ));
        Ok(DelayStrategy::new(mode)
            .with_scenario(STREAM_CHUNK, chunk)
            .with_scenario(RECOMMENDATIONS, mode))
    }

    pub fn id_generator(&self) -> Result<Arc<dyn ReviewIdGenerator>> {
        generator_from_name(&self.id_generator)
    }

    pub fn upstream_client(&self) -> Result<UpstreamClient> {
        let video_url = parse_url("video_url", &self.video_url)?;
        let featured_url = self
            .featured_upstream_url
            .as_deref()
            .map(|url| parse_url("featured_upstream_url", url))
            .transpose()?;
        UpstreamClient::new(video_url, featured_url)
    }
}

fn parse_url(field: &str, value: &str) -> Result<Url> {
    Url::parse(value)
        .map_err(|e| MockError::Validation(format!("{} '{}' is not a valid URL: {}", field, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;
    use std::time::Duration;

    fn from_toml(toml: &str) -> Result<MockServerConfig> {
        MockServerConfig::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = from_toml("").unwrap();

        assert_eq!(config.port, 4000);
        assert!(config.cors_enabled);
        assert_eq!(config.video_url, DEMO_VIDEO_URL);
        assert_eq!(config.delay_strategy().unwrap(), DelayStrategy::simulated());
    }

    #[test]
    fn test_values_from_file() {
        let config = from_toml(
            r#"
            host = "127.0.0.1"
            port = 4100
            delay = "250"
            stream_chunk_delay_ms = 10
            id_generator = "sequential"
            featured_upstream_url = "http://localhost:3000/api/featured"
            "#,
        )
        .unwrap();

        assert_eq!(
            config.socket_addr().unwrap(),
            "127.0.0.1:4100".parse::<SocketAddr>().unwrap()
        );

        let delay = config.delay_strategy().unwrap();
        assert_eq!(
            delay.mode_for(RECOMMENDATIONS),
            DelayMode::Fixed(Duration::from_millis(250))
        );
        assert_eq!(
            delay.mode_for(STREAM_CHUNK),
            DelayMode::Fixed(Duration::from_millis(10))
        );

        assert_eq!(config.id_generator().unwrap().next_id(), "review-1");

        let upstream = config.upstream_client().unwrap();
        assert_eq!(
            upstream.featured_url().map(Url::as_str),
            Some("http://localhost:3000/api/featured")
        );
    }

    #[test]
    fn test_none_delay_disables_stream_delay_too() {
        let config = from_toml(r#"delay = "none""#).unwrap();
        let delay = config.delay_strategy().unwrap();

        assert_eq!(delay.mode_for(STREAM_CHUNK), DelayMode::None);
        assert_eq!(delay.mode_for(RECOMMENDATIONS), DelayMode::None);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            from_toml(r#"delay = "sometimes""#),
            Err(MockError::Validation(_))
        ));
        assert!(matches!(
            from_toml(r#"id_generator = "snowflake""#),
            Err(MockError::Validation(_))
        ));
        assert!(matches!(
            from_toml(r#"featured_upstream_url = "not a url""#),
            Err(MockError::Validation(_))
        ));
        assert!(matches!(
            from_toml(r#"host = "no such host""#),
            Err(MockError::Validation(_))
        ));
    }

    #[test]
    fn test_wrong_type_is_config_error() {
        assert!(matches!(
            from_toml(r#"port = "not-a-port""#),
            Err(MockError::Config(_))
        ));
    }
}
