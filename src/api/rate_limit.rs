//! Per-client fixed-window rate limiting.
//!
//! Deployment triggers and domain mutations each make one expensive
//! third-party call; a small per-IP budget bounds the blast radius of a
//! misbehaving client without any shared infrastructure.

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// Default operation budget per window.
pub const DEFAULT_MAX_OPS: u32 = 10;

/// Default window length in seconds.
pub const DEFAULT_WINDOW_SECS: i64 = 60;

#[derive(Debug, Clone, Copy)]
struct WindowState {
    started_at: DateTime<Utc>,
    count: u32,
}

/// Fixed-window counter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    max_ops: u32,
    window: TimeDelta,
    clock: Arc<dyn Clock + Send + Sync>,
    windows: Arc<Mutex<HashMap<IpAddr, WindowState>>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `max_ops` operations per window.
    #[must_use]
    pub fn new(max_ops: u32, window: TimeDelta, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            max_ops,
            window,
            clock,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a limiter with the default 10-per-60-seconds budget.
    #[must_use]
    pub fn with_defaults(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self::new(
            DEFAULT_MAX_OPS,
            TimeDelta::seconds(DEFAULT_WINDOW_SECS),
            clock,
        )
    }

    /// Records one operation for a client and returns whether it fits the
    /// budget.
    ///
    /// A poisoned counter lock fails open: rate limiting is protective, not
    /// load-bearing.
    #[must_use]
    pub fn check(&self, client: IpAddr) -> bool {
        let now = self.clock.utc();
        let Ok(mut windows) = self.windows.lock() else {
            return true;
        };

        let window = windows.entry(client).or_insert_with(|| WindowState {
            started_at: now,
            count: 0,
        });
        if now - window.started_at >= self.window {
            window.started_at = now;
            window.count = 0;
        }
        window.count = window.count.saturating_add(1);
        window.count <= self.max_ops
    }
}
