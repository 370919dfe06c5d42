use std::{
    collections::{HashMap, VecDeque},
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};

use crate::{
    api::error,
    modules::rate_limit::{RateLimitPolicy, RateLimiter},
};

struct WindowState {
    events: HashMap<String, VecDeque<Instant>>,
    last_sweep: Instant,
}

/// In-process limiter. Keys with no events inside the window are evicted.
pub struct InMemoryRateLimiter {
    policy: RateLimitPolicy,
    state: Mutex<WindowState>,
}

fn prune(events: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = events.front() {
        if now.saturating_duration_since(*oldest) < window {
            break;
        }
        events.pop_front();
    }
}

impl InMemoryRateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        log::info!(
            "In-memory rate limiter: {} events per {:?}",
            policy.max_events,
            policy.window
        );
        Self {
            policy,
            state: Mutex::new(WindowState { events: HashMap::new(), last_sweep: Instant::now() }),
        }
    }

    pub fn try_acquire_at(&self, key: &str, now: Instant) -> bool {
        let window = self.policy.window;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if now.saturating_duration_since(state.last_sweep) >= window {
            state.events.retain(|_, events| {
                prune(events, now, window);
                !events.is_empty()
            });
            state.last_sweep = now;
        }

        let events = state.events.entry(key.to_owned()).or_default();
        prune(events, now, window);

        if events.len() >= self.policy.max_events {
            if events.is_empty() {
                state.events.remove(key);
            }
            return false;
        }

        events.push_back(now);
        true
    }

    /// Number of keys currently holding events.
    #[cfg(test)]
    pub fn tracked_keys(&self) -> usize {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).events.len()
    }
}

#[async_trait::async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn try_acquire(&self, key: &str) -> Result<bool, error::SystemError> {
        Ok(self.try_acquire_at(key, Instant::now()))
    }
}
