//! Gateway Rate Limiting Module
//!
//! Fixed window per client address: the first request opens a window, and
//! requests past `max_requests` inside it are refused until it expires.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RateLimiter {
    // client -> (request_count, window_start)
    limits: Arc<RwLock<HashMap<String, (u32, Instant)>>>,
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(10, 60)
    }
}

impl RateLimiter {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            limits: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Check if a request from the given client is allowed, counting it if so.
    pub async fn check_limit(&self, client: &str) -> bool {
        let mut limits = self.limits.write().await;
        let now = Instant::now();

        let state = limits.entry(client.to_string()).or_insert((0, now));

        if now.duration_since(state.1) >= self.window {
            state.0 = 1;
            state.1 = now;
            debug!(client, "Rate limit window reset");
            true
        } else if state.0 >= self.max_requests {
            warn!(client, limit = self.max_requests, "Rate limit exceeded");
            false
        } else {
            state.0 += 1;
            debug!(client, count = state.0, limit = self.max_requests, "Rate limit OK");
            true
        }
    }

    /// Drop windows that have expired. Returns how many were removed.
    pub async fn prune_expired(&self) -> usize {
        let mut limits = self.limits.write().await;
        let now = Instant::now();
        let before = limits.len();
        limits.retain(|_, (_, start)| now.duration_since(*start) < self.window);
        before - limits.len()
    }

    /// Prune expired windows every `window` in the background.
    pub fn spawn_pruner(&self) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.window);
            loop {
                ticker.tick().await;
                let removed = limiter.prune_expired().await;
                if removed > 0 {
                    debug!(removed, "Pruned expired rate limit windows");
                }
            }
        })
    }
}
