use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    /// JSON text of the stored value.
    pub payload: String,
    /// The entry is stale strictly after this instant.
    pub expires_at: DateTime<Utc>,
    pub tags: Vec<String>,
    /// How long the supplier took to produce the value.
    pub compute_ms: u64,
}

impl CacheEntry {
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }

    pub fn has_any_tag(&self, tags: &[&str]) -> bool {
        self.tags.iter().any(|tag| tags.contains(&tag.as_str()))
    }
}

/// What a cache supplier hands back: the value plus its expiry and tags.
#[derive(Debug, Clone)]
pub struct Computed<T> {
    pub value: T,
    pub expires_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl<T> Computed<T> {
    pub fn new(value: T, expires_at: DateTime<Utc>) -> Self {
        Self {
            value,
            expires_at,
            tags: Vec::new(),
        }
    }

    pub fn expires_in(value: T, ttl: Duration) -> Self {
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::new(value, expires_at)
    }

    /// Stored, but stale as soon as the current instant has passed, so the
    /// next lookup runs the supplier again.
    pub fn expired_now(value: T) -> Self {
        Self::new(value, Utc::now())
    }

    pub fn tagged(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| tag.to_string()).collect();
        self
    }
}

/// Freshness budget for probabilistic early refresh.
///
/// `INF` (the default) and `0` honour `expires_at` literally. A finite
/// positive beta lets a live entry be recomputed ahead of its expiry, more
/// eagerly the slower its supplier was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beta(f64);

impl Beta {
    pub const HARD_EXPIRY: Beta = Beta(f64::INFINITY);

    pub fn new(value: f64) -> Option<Self> {
        if value.is_nan() || value < 0.0 {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn refreshes_early(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    pub fn should_recompute(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        if !entry.is_live(now) {
            return true;
        }
        if !self.refreshes_early() {
            return false;
        }

        // sample in (0, 1] so ln() stays finite
        let sample = 1.0 - rand::random::<f64>();
        let head_start_ms = -(entry.compute_ms as f64) * self.0 * sample.ln();
        let remaining_ms = (entry.expires_at - now).num_milliseconds() as f64;
        remaining_ms <= head_start_ms
    }
}

impl Default for Beta {
    fn default() -> Self {
        Self::HARD_EXPIRY
    }
}
