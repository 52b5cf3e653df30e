//! Rate Limiting Infrastructure
//!
//! Fixed-window rate limiting behind a store trait, so the process-local
//! in-memory implementation can be swapped for a shared backend when the
//! API is scaled horizontally. Time comes from an injected [`Clock`] so
//! window behavior is testable without sleeping.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }
}

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub reset_at_ms: i64,
}

impl RateLimitResult {
    /// Seconds until the window resets, for the Retry-After header.
    pub fn retry_after_secs(&self, now_ms: i64) -> i64 {
        ((self.reset_at_ms - now_ms).max(0) + 999) / 1000
    }
}

/// Time source abstraction
pub trait Clock: Send + Sync + 'static {
    /// Current time in Unix milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Check and increment the counter for `key`.
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult;
}

// ============================================================================
// In-memory fixed-window store
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at_ms: i64,
}

/// Process-local fixed-window counter store.
///
/// Not shared across instances; a horizontally scaled deployment needs a
/// store backend over shared storage instead.
pub struct FixedWindowStore<C: Clock = SystemClock> {
    entries: Mutex<HashMap<String, Window>>,
    clock: C,
}

impl FixedWindowStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for FixedWindowStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> FixedWindowStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Drop every expired window. Returns the number removed.
    pub async fn sweep(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, w| w.reset_at_ms > now);
        before - entries.len()
    }

    /// Spawn a background task pruning expired windows on an interval.
    pub fn spawn_sweeper(self: Arc<Self>, every: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let removed = self.sweep().await;
                if removed > 0 {
                    tracing::debug!(windows_removed = removed, "Rate limit window sweep");
                }
            }
        })
    }
}

impl<C: Clock> RateLimitStore for FixedWindowStore<C> {
    async fn check_and_increment(&self, key: &str, config: &RateLimitConfig) -> RateLimitResult {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock().await;

        let window = entries.entry(key.to_string()).or_insert(Window {
            count: 0,
            reset_at_ms: now + config.window_ms(),
        });

        if now >= window.reset_at_ms {
            window.count = 0;
            window.reset_at_ms = now + config.window_ms();
        }

        if window.count >= config.max_requests {
            return RateLimitResult {
                allowed: false,
                remaining: 0,
                reset_at_ms: window.reset_at_ms,
            };
        }

        window.count += 1;
        RateLimitResult {
            allowed: true,
            remaining: config.max_requests - window.count,
            reset_at_ms: window.reset_at_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    struct ManualClock(AtomicI64);

    impl ManualClock {
        fn new(start_ms: i64) -> Self {
            Self(AtomicI64::new(start_ms))
        }

        fn advance(&self, ms: i64) {
            self.0.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for Arc<ManualClock> {
        fn now_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn test_allows_up_to_limit_then_blocks() {
        let clock = Arc::new(ManualClock::new(0));
        let store = FixedWindowStore::with_clock(clock.clone());
        let config = RateLimitConfig::new(3, 60);

        for _ in 0..3 {
            assert!(RateLimitStore::check_and_increment(&store, "1.2.3.4", &config).await.allowed);
        }
        let blocked = RateLimitStore::check_and_increment(&store, "1.2.3.4", &config).await;
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
    }

    #[tokio::test]
    async fn test_window_resets_after_expiry() {
        let clock = Arc::new(ManualClock::new(0));
        let store = FixedWindowStore::with_clock(clock.clone());
        let config = RateLimitConfig::new(1, 60);

        assert!(RateLimitStore::check_and_increment(&store, "k", &config).await.allowed);
        assert!(!RateLimitStore::check_and_increment(&store, "k", &config).await.allowed);

        clock.advance(60_001);
        assert!(RateLimitStore::check_and_increment(&store, "k", &config).await.allowed);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let clock = Arc::new(ManualClock::new(0));
        let store = FixedWindowStore::with_clock(clock.clone());
        let config = RateLimitConfig::new(1, 60);

        assert!(RateLimitStore::check_and_increment(&store, "a", &config).await.allowed);
        assert!(RateLimitStore::check_and_increment(&store, "b", &config).await.allowed);
        assert!(!RateLimitStore::check_and_increment(&store, "a", &config).await.allowed);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let clock = Arc::new(ManualClock::new(0));
        let store = FixedWindowStore::with_clock(clock.clone());
        let config = RateLimitConfig::new(5, 60);

        RateLimitStore::check_and_increment(&store, "old", &config).await;
        clock.advance(30_000);
        RateLimitStore::check_and_increment(&store, "fresh", &config).await;

        clock.advance(31_000); // "old" expired, "fresh" still live
        assert_eq!(store.sweep().await, 1);
        assert_eq!(store.sweep().await, 0);
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            reset_at_ms: 10_500,
        };
        assert_eq!(result.retry_after_secs(10_000), 1);
        assert_eq!(result.retry_after_secs(10_500), 0);
        assert_eq!(result.retry_after_secs(11_000), 0);
    }
}
