// Upstream HTTP client for pass-through routes

//! Two routes reach out to real servers: the featured list can be composed with
//! an upstream list, and the stream route proxies a demo video. Both go through
//! [`UpstreamClient`] so tests can point them at a local server.

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::engine::fixtures::DEMO_VIDEO_URL;
use crate::{MockError, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    video_url: Url,
    featured_url: Option<Url>,
}

impl UpstreamClient {
    pub fn new(video_url: Url, featured_url: Option<Url>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            video_url,
            featured_url,
        })
    }

    /// Client for the public demo video with no featured upstream
    pub fn demo() -> Result<Self> {
        let video_url = Url::parse(DEMO_VIDEO_URL)
            .map_err(|e| MockError::Internal(format!("demo video url: {}", e)))?;
        Self::new(video_url, None)
    }

    pub fn video_url(&self) -> &Url {
        &self.video_url
    }

    pub fn featured_url(&self) -> Option<&Url> {
        self.featured_url.as_ref()
    }

    /// Fetch the upstream featured list
    ///
    /// Returns an empty list when no upstream is configured. Items are kept as raw
    /// JSON so fields the mock does not model survive the pass-through.
    pub async fn fetch_featured(&self) -> Result<Vec<serde_json::Value>> {
        let Some(url) = &self.featured_url else {
            return Ok(Vec::new());
        };

        debug!("Fetching upstream featured list from {}", url);
        let items = self
            .http
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<serde_json::Value>>()
            .await?;

        Ok(items)
    }

    /// Start downloading the demo video
    ///
    /// The upstream status is not checked; the stream route passes it through.
    pub async fn open_video_stream(&self) -> Result<reqwest::Response> {
        debug!("Opening upstream video stream {}", self.video_url);
        Ok(self.http.get(self.video_url.clone()).send().await?)
    }
}
