//! Sliding-window rate limiting.
//!
//! `RateLimiter::try_acquire` admits at most `max_events` events per key in
//! any trailing `window`. Two backends:
//!
//! - [`memory::InMemoryRateLimiter`]: per-process, shared by all actix workers.
//! - [`redis::RedisRateLimiter`]: one sorted set per key, shared across processes.
use std::time::Duration;

use crate::api::error;

pub mod memory;
pub mod redis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_events: usize,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(max_events: usize, window: Duration) -> Self {
        Self { max_events, window }
    }
}

#[async_trait::async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records an event for `key` and returns `true` if it fits in the window.
    /// A rejected attempt is not recorded.
    async fn try_acquire(&self, key: &str) -> Result<bool, error::SystemError>;
}
