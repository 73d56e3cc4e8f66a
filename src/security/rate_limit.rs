//! Token-bucket rate limiting keyed by request identity.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::config::RateLimitConfig;

/// Per-identity bucket state.
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    /// Available tokens, always within [0, capacity].
    tokens: f64,
    /// When the last refill was computed. Never moves backward.
    last_refill: Instant,
}

/// A shared token-bucket rate limiter.
///
/// Constructed once at process start, handed to the request pipeline by
/// reference, and shut down at process stop. Entries are created lazily
/// on first sight of an identity and reaped by a periodic sweep once
/// idle long enough.
pub struct RateLimiter {
    store: Mutex<HashMap<String, RateLimitEntry>>,
    capacity: f64,
    refill_per_sec: f64,
    sweep_interval: Duration,
    max_idle: Duration,
    stop_tx: watch::Sender<bool>,
}

impl RateLimiter {
    /// Create a limiter from configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            store: Mutex::new(HashMap::new()),
            capacity: config.bucket_capacity as f64,
            refill_per_sec: config.tokens_per_minute as f64 / 60.0,
            sweep_interval: Duration::from_secs(config.sweep_interval_secs),
            max_idle: Duration::from_secs(config.max_idle_secs),
            stop_tx,
        }
    }

    /// Try to consume one token for `identity`.
    pub fn allow(&self, identity: &str) -> bool {
        self.allow_n(identity, 1.0)
    }

    /// Try to consume `cost` tokens for `identity`.
    pub fn allow_n(&self, identity: &str, cost: f64) -> bool {
        self.allow_at(identity, cost, Instant::now())
    }

    fn allow_at(&self, identity: &str, cost: f64, now: Instant) -> bool {
        let mut store = self.store.lock().expect("rate limit store mutex poisoned");

        let entry = store
            .entry(identity.to_string())
            .or_insert(RateLimitEntry {
                tokens: self.capacity,
                last_refill: now,
            });

        // Lazy refill. saturating_duration_since clamps elapsed at zero,
        // so a caller-supplied `now` older than the stored timestamp can
        // never subtract tokens.
        let elapsed = now.saturating_duration_since(entry.last_refill);
        entry.tokens =
            (entry.tokens + elapsed.as_secs_f64() * self.refill_per_sec).min(self.capacity);
        entry.last_refill = entry.last_refill.max(now);

        if entry.tokens >= cost {
            entry.tokens -= cost;
            true
        } else {
            // The refill above stays committed on a denial; only the
            // consumption is skipped. A request storm therefore keeps
            // accruing tokens instead of stalling the bucket.
            false
        }
    }

    /// Remove entries idle longer than the staleness threshold.
    pub fn sweep(&self) {
        self.sweep_at(Instant::now());
    }

    fn sweep_at(&self, now: Instant) {
        let mut store = self.store.lock().expect("rate limit store mutex poisoned");
        let before = store.len();
        store.retain(|_, entry| now.saturating_duration_since(entry.last_refill) <= self.max_idle);
        let removed = before - store.len();
        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = store.len(),
                "Swept stale rate limit entries"
            );
        }
    }

    /// Spawn the periodic sweep task.
    ///
    /// The task exits when [`RateLimiter::shutdown`] is called or when
    /// the process-wide shutdown signal fires, whichever comes first.
    pub fn spawn_sweeper(self: &Arc<Self>, mut shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        let limiter = Arc::clone(self);
        let mut stop_rx = self.stop_tx.subscribe();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(limiter.sweep_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => limiter.sweep(),
                    _ = stop_rx.changed() => break,
                    _ = shutdown.recv() => break,
                }
            }
            tracing::debug!("Rate limit sweeper stopped");
        })
    }

    /// Halt the sweeper and clear the store.
    ///
    /// Safe to call more than once; subsequent calls are no-ops on an
    /// already-empty store.
    pub fn shutdown(&self) {
        let _ = self.stop_tx.send(true);
        self.store
            .lock()
            .expect("rate limit store mutex poisoned")
            .clear();
    }

    /// Number of identities currently tracked.
    pub fn tracked_identities(&self) -> usize {
        self.store.lock().expect("rate limit store mutex poisoned").len()
    }

    #[cfg(test)]
    fn snapshot(&self, identity: &str) -> Option<(f64, Instant)> {
        self.store
            .lock()
            .unwrap()
            .get(identity)
            .map(|e| (e.tokens, e.last_refill))
    }
}
