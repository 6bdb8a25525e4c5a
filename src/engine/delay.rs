// Latency injection for mock handlers

//! # Delay Strategy
//!
//! Handlers never sleep on their own. They ask the [`DelayStrategy`] in shared
//! state to wait for a named scenario, and the strategy decides how long:
//!
//! ```text
//! handler ── wait("recommendations") ──▶ DelayStrategy
//!                                          ├─ override for scenario?  → use it
//!                                          └─ otherwise               → default mode
//! ```
//!
//! Tests build [`DelayStrategy::instant`] so nothing waits; the server defaults to
//! [`DelayStrategy::simulated`], which behaves like a slow network.
//!
//! ## Rust Learning Notes:
//!
//! ### Futures That Never Complete
//! `std::future::pending()` returns a future that is never ready. Awaiting it
//! parks the request forever without blocking the runtime thread, which is how
//! `DelayMode::Infinite` simulates a server that never answers.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;
use tracing::trace;

use crate::MockError;

/// Scenario used for every chunk of the proxied video stream
pub const STREAM_CHUNK: &str = "stream_chunk";

/// Scenario used before the recommendations route answers
pub const RECOMMENDATIONS: &str = "recommendations";

/// Per-chunk delay of the video stream in simulated mode
pub const STREAM_CHUNK_DELAY: Duration = Duration::from_millis(1500);

/// Bounds of the randomized "realistic" server response time
pub const REALISTIC_MIN_MS: u64 = 100;
pub const REALISTIC_MAX_MS: u64 = 400;

/// How long a single wait lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayMode {
    /// Complete immediately
    None,
    /// Sleep for a fixed duration
    Fixed(Duration),
    /// Sleep for a random duration between 100 and 400 ms
    Realistic,
    /// Never complete
    Infinite,
}

impl DelayMode {
    pub async fn wait(self) {
        match self {
            DelayMode::None => {}
            DelayMode::Fixed(duration) => tokio::time::sleep(duration).await,
            DelayMode::Realistic => {
                let millis = rand::thread_rng().gen_range(REALISTIC_MIN_MS..=REALISTIC_MAX_MS);
                tokio::time::sleep(Duration::from_millis(millis)).await
            }
            DelayMode::Infinite => std::future::pending::<()>().await,
        }
    }
}

impl fmt::Display for DelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayMode::None => write!(f, "none"),
            DelayMode::Fixed(duration) => write!(f, "{}", duration.as_millis()),
            DelayMode::Realistic => write!(f, "realistic"),
            DelayMode::Infinite => write!(f, "infinite"),
        }
    }
}

/// Parses `none`, `realistic`, `infinite`, or a number of milliseconds
impl FromStr for DelayMode {
    type Err = MockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" => Ok(DelayMode::None),
            "realistic" | "real" => Ok(DelayMode::Realistic),
            "infinite" => Ok(DelayMode::Infinite),
            other => other
                .parse::<u64>()
                .map(|ms| DelayMode::Fixed(Duration::from_millis(ms)))
                .map_err(|_| {
                    MockError::Validation(format!(
                        "invalid delay '{}', expected none, realistic, infinite or milliseconds",
                        other
                    ))
                }),
        }
    }
}

/// Default delay mode plus per-scenario overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayStrategy {
    default: DelayMode,
    scenarios: HashMap<String, DelayMode>,
}

impl DelayStrategy {
    /// Every scenario uses `default`
    pub fn new(default: DelayMode) -> Self {
        Self {
            default,
            scenarios: HashMap::new(),
        }
    }

    /// Nothing ever waits
    pub fn instant() -> Self {
        Self::new(DelayMode::None)
    }

    /// Slow-network mode: realistic latency, 1.5s per video chunk
    pub fn simulated() -> Self {
        Self::new(DelayMode::Realistic)
            .with_scenario(STREAM_CHUNK, DelayMode::Fixed(STREAM_CHUNK_DELAY))
            .with_scenario(RECOMMENDATIONS, DelayMode::Realistic)
    }

    pub fn with_scenario(mut self, scenario: impl Into<String>, mode: DelayMode) -> Self {
        self.scenarios.insert(scenario.into(), mode);
        self
    }

    pub fn default_mode(&self) -> DelayMode {
        self.default
    }

    /// Mode that applies to `scenario`
    pub fn mode_for(&self, scenario: &str) -> DelayMode {
        self.scenarios.get(scenario).copied().unwrap_or(self.default)
    }

    /// Suspend the current request for the scenario's delay
    pub async fn wait(&self, scenario: &str) {
        let mode = self.mode_for(scenario);
        trace!("Delaying {} ({})", scenario, mode);
        mode.wait().await
    }
}

impl Default for DelayStrategy {
    fn default() -> Self {
        Self::simulated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_parse_modes() {
        assert_eq!("none".parse::<DelayMode>().unwrap(), DelayMode::None);
        assert_eq!("Realistic".parse::<DelayMode>().unwrap(), DelayMode::Realistic);
        assert_eq!("infinite".parse::<DelayMode>().unwrap(), DelayMode::Infinite);
        assert_eq!(
            "250".parse::<DelayMode>().unwrap(),
            DelayMode::Fixed(Duration::from_millis(250))
        );
        assert!("slow".parse::<DelayMode>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for mode in [
            DelayMode::None,
            DelayMode::Realistic,
            DelayMode::Infinite,
            DelayMode::Fixed(Duration::from_millis(42)),
        ] {
            assert_eq!(mode.to_string().parse::<DelayMode>().unwrap(), mode);
        }
    }

    #[test]
    fn test_scenario_override_wins_over_default() {
        let strategy = DelayStrategy::instant().with_scenario("slow", DelayMode::Infinite);

        assert_eq!(strategy.mode_for("slow"), DelayMode::Infinite);
        assert_eq!(strategy.mode_for("anything-else"), DelayMode::None);
    }

    #[test]
    fn test_simulated_mode_slows_stream_chunks() {
        let strategy = DelayStrategy::simulated();
        assert_eq!(
            strategy.mode_for(STREAM_CHUNK),
            DelayMode::Fixed(Duration::from_millis(1500))
        );
        assert_eq!(strategy.mode_for(RECOMMENDATIONS), DelayMode::Realistic);
    }

    #[test]
    fn test_instant_wait_is_ready_on_first_poll() {
        let strategy = DelayStrategy::instant();
        let mut wait = task::spawn(strategy.wait(RECOMMENDATIONS));
        assert_ready!(wait.poll());
    }

    #[test]
    fn test_infinite_wait_never_completes() {
        let strategy = DelayStrategy::new(DelayMode::Infinite);
        let mut wait = task::spawn(strategy.wait(RECOMMENDATIONS));
        assert_pending!(wait.poll());
        assert_pending!(wait.poll());
    }

    #[tokio::test]
    async fn test_fixed_wait_sleeps_at_least_the_duration() {
        let strategy = DelayStrategy::new(DelayMode::Fixed(Duration::from_millis(30)));
        let started = Instant::now();
        strategy.wait(STREAM_CHUNK).await;
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
