//! Redis-backed sliding window.
//!
//! Key schema: `rate_limit:{key}` is a sorted set of event ids scored by
//! their timestamp in milliseconds. The set expires one window after its last
//! event, so idle keys disappear on their own.
use deadpool_redis::redis;
use uuid::Uuid;

use crate::{
    api::error,
    modules::rate_limit::{RateLimitPolicy, RateLimiter},
};

const RATE_LIMIT_PREFIX: &str = "rate_limit:";

#[derive(Clone)]
pub struct RedisRateLimiter {
    pool: deadpool_redis::Pool,
    policy: RateLimitPolicy,
}

impl RedisRateLimiter {
    pub fn new(pool: deadpool_redis::Pool, policy: RateLimitPolicy) -> Self {
        log::info!("Redis rate limiter: {} events per {:?}", policy.max_events, policy.window);
        Self { pool, policy }
    }
}

/// Highest score still pruned: an event exactly one window old no longer counts.
fn prune_ceiling(now_ms: i64, window_ms: i64) -> i64 {
    now_ms - window_ms
}

/// `count` includes the attempt just added.
fn within_limit(count: usize, max_events: usize) -> bool {
    count <= max_events
}

#[async_trait::async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn try_acquire(&self, key: &str) -> Result<bool, error::SystemError> {
        let mut conn = self.pool.get().await?;
        let key = format!("{RATE_LIMIT_PREFIX}{key}");
        let window_ms = self.policy.window.as_millis() as i64;
        let now = chrono::Utc::now().timestamp_millis();
        let member = Uuid::now_v7().to_string();

        // Add first, then count: concurrent callers are serialised by MULTI/EXEC,
        // so at most `max_events` of them can observe a count within the limit.
        let (count,): (usize,) = redis::pipe()
            .atomic()
            .zrembyscore(&key, "-inf", prune_ceiling(now, window_ms))
            .ignore()
            .zadd(&key, &member, now)
            .ignore()
            .zcard(&key)
            .pexpire(&key, window_ms)
            .ignore()
            .query_async(&mut *conn)
            .await?;

        if !within_limit(count, self.policy.max_events) {
            redis::pipe().zrem(&key, &member).query_async::<()>(&mut *conn).await?;
            return Ok(false);
        }

        Ok(true)
    }
}
