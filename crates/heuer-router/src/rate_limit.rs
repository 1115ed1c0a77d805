//! Per-analyst write rate limiting.
//!
//! Counters live behind the [`RateLimitStore`] trait so the in-process map
//! can be replaced by a shared store (Redis, memcached) without touching the
//! handlers. Windows are fixed: the first write opens a window, later writes
//! count against it until it expires.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Counter state for one key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    /// Writes counted in the current window, including this one
    pub count: u32,
    /// When the current window closes
    pub expires_at: Instant,
}

/// Backing store for rate-limit counters
pub trait RateLimitStore: Send + Sync {
    /// Count one hit for `key`, opening a new window if none is live at `now`
    fn increment(&self, key: &str, window: Duration, now: Instant) -> WindowState;

    /// Drop every window that expired before `now`; returns how many were dropped
    fn purge_expired(&self, now: Instant) -> usize;
}

/// In-memory map + expiry store
///
/// Expired windows are swept at most once per window length, on the first
/// increment after the previous sweep falls due.
#[derive(Debug, Default)]
pub struct InMemoryRateLimitStore {
    windows: RwLock<Windows>,
}

#[derive(Debug, Default)]
struct Windows {
    entries: HashMap<String, WindowState>,
    next_sweep: Option<Instant>,
}

impl Windows {
    fn retain_live(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, state| state.expires_at > now);
        before - self.entries.len()
    }
}

impl InMemoryRateLimitStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live or expired-but-unswept keys
    pub fn len(&self) -> usize {
        self.windows.read().unwrap().entries.len()
    }

    /// Whether no key is tracked
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RateLimitStore for InMemoryRateLimitStore {
    fn increment(&self, key: &str, window: Duration, now: Instant) -> WindowState {
        let mut windows = self.windows.write().unwrap();

        if windows.next_sweep.is_none_or(|due| now >= due) {
            let swept = windows.retain_live(now);
            if swept > 0 {
                tracing::debug!(swept, "Swept expired rate-limit windows");
            }
            windows.next_sweep = Some(now + window);
        }

        let state = windows
            .entries
            .entry(key.to_string())
            .and_modify(|state| {
                if now >= state.expires_at {
                    *state = WindowState {
                        count: 0,
                        expires_at: now + window,
                    };
                }
            })
            .or_insert(WindowState {
                count: 0,
                expires_at: now + window,
            });

        state.count = state.count.saturating_add(1);
        *state
    }

    fn purge_expired(&self, now: Instant) -> usize {
        self.windows.write().unwrap().retain_live(now)
    }
}

/// Write refused because the analyst is over the limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Rate limit exceeded, retry in {retry_after_secs}s")]
pub struct RateLimited {
    /// Seconds until the current window closes
    pub retry_after_secs: u64,
}

/// Applies a [`RateLimitConfig`] over an injected store
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    max_writes: u32,
    window: Duration,
}

impl RateLimiter {
    /// Create a limiter over the given store
    pub fn new(store: Arc<dyn RateLimitStore>, config: RateLimitConfig) -> Self {
        Self {
            store,
            max_writes: config.max_writes,
            window: Duration::from_secs(config.window_secs),
        }
    }

    /// Create a limiter backed by a fresh in-memory store
    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(Arc::new(InMemoryRateLimitStore::new()), config)
    }

    /// Record one write for `analyst`
    pub fn check(&self, analyst: &str) -> Result<(), RateLimited> {
        self.check_at(analyst, Instant::now())
    }

    /// Record one write for `analyst` at a given instant
    pub fn check_at(&self, analyst: &str, now: Instant) -> Result<(), RateLimited> {
        let state = self.store.increment(analyst, self.window, now);
        if state.count <= self.max_writes {
            return Ok(());
        }

        let remaining = state.expires_at.saturating_duration_since(now);
        Err(RateLimited {
            retry_after_secs: remaining.as_secs().max(1),
        })
    }
}
