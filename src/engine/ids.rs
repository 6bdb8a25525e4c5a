// Review id generation
// New reviews get their id from an injected generator

//! # Review Ids
//!
//! Three generators are provided:
//! - [`UuidIds`]: UUID v4, the server default
//! - [`SequentialIds`]: `review-1`, `review-2`, ... for deterministic tests
//! - [`RandomHexIds`]: short random hex strings, the format the web client saw
//!   from its original in-browser mocks
//!
//! ## Rust Learning Notes:
//!
//! ### Atomics
//! `SequentialIds` uses an `AtomicU64` so it can hand out ids through `&self`
//! from many tasks at once without a lock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::{MockError, Result};

/// Source of ids for newly created reviews
pub trait ReviewIdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// UUID v4 ids
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl ReviewIdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic ids with a fixed prefix
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("review")
    }
}

impl ReviewIdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}", self.prefix, n)
    }
}

/// Random hex ids; collisions are possible but unlikely
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomHexIds;

impl ReviewIdGenerator for RandomHexIds {
    fn next_id(&self) -> String {
        let value: u64 = rand::thread_rng().gen();
        format!("{:x}", value)
    }
}

/// Resolve a generator from its configuration name
///
/// Accepted names: `uuid`, `sequential`, `random`.
pub fn generator_from_name(name: &str) -> Result<Arc<dyn ReviewIdGenerator>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "uuid" => Ok(Arc::new(UuidIds)),
        "sequential" => Ok(Arc::new(SequentialIds::default())),
        "random" => Ok(Arc::new(RandomHexIds)),
        other => Err(MockError::Validation(format!(
            "unknown review id generator '{}', expected uuid, sequential or random",
            other
        ))),
    }
}
