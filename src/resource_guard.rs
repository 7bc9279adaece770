//! The resource guard (C11): bounds request body size, in-flight
//! concurrency, and batch throughput before a request is ever handed to
//! the [`crate::executor::Executor`], surfacing a typed
//! [`Error::ResourceProtection`] rather than dispatching to DynamoDB.
//!
//! This is the only place in the crate that tracks mutable shared state
//! beyond the model registry and the DynamoDB client itself.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::{Semaphore, SemaphorePermit};

use crate::error::Error;

#[derive(Debug, Clone, Copy)]
pub struct ResourceGuardConfig {
    /// Maximum size, in bytes, of a single item/request body this guard
    /// will admit. DynamoDB's own item-size ceiling is 400KiB; this is
    /// meant to catch oversized payloads before they're serialized.
    pub max_request_body_bytes: usize,
    /// Maximum number of concurrent non-batch requests (Get/Put/Update/
    /// Delete/Query/Scan).
    pub max_concurrent_requests: usize,
    /// Maximum number of concurrent batch operations (BatchGet/BatchWrite/
    /// TransactWrite).
    pub max_concurrent_batches: usize,
    /// Token-bucket capacity and refill rate for batch traffic.
    pub batch_rate_limit: TokenBucketConfig,
}

impl Default for ResourceGuardConfig {
    fn default() -> Self {
        Self {
            max_request_body_bytes: 400 * 1024,
            max_concurrent_requests: 256,
            max_concurrent_batches: 32,
            batch_rate_limit: TokenBucketConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TokenBucketConfig {
    pub capacity: u64,
    pub refill_per_second: u64,
}

impl Default for TokenBucketConfig {
    fn default() -> Self {
        Self { capacity: 50, refill_per_second: 25 }
    }
}

/// Classic token bucket: `capacity` tokens available up front, refilled at
/// `refill_per_second`. `try_acquire` never blocks -- callers that can't
/// get a token are rejected immediately rather than queued, matching
/// "Exceeding any bound yields a typed rejection without dispatching".
struct TokenBucket {
    config: TokenBucketConfig,
    state: Mutex<TokenBucketState>,
}

struct TokenBucketState {
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(config: TokenBucketConfig) -> Self {
        Self {
            config,
            state: Mutex::new(TokenBucketState { tokens: config.capacity as f64, last_refill: Instant::now() }),
        }
    }

    fn try_acquire(&self, cost: u64) -> bool {
        let mut state = self.state.lock().expect("resource guard token bucket lock poisoned");
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_refill).as_secs_f64();
        state.tokens = (state.tokens + elapsed * self.config.refill_per_second as f64)
            .min(self.config.capacity as f64);
        state.last_refill = now;

        if state.tokens >= cost as f64 {
            state.tokens -= cost as f64;
            true
        } else {
            false
        }
    }
}

/// Shared across every clone of an [`crate::executor::Executor`]. Cheap to
/// clone: everything inside is an `Arc`.
#[derive(Clone)]
pub struct ResourceGuard {
    config: ResourceGuardConfig,
    requests: Arc<Semaphore>,
    batches: Arc<Semaphore>,
    batch_tokens: Arc<TokenBucket>,
    in_flight_bytes: Arc<AtomicU64>,
}

/// Held for the duration of one guarded request; dropping it releases the
/// concurrency slot.
pub struct RequestGuard<'a> {
    _permit: SemaphorePermit<'a>,
    bytes: u64,
    counter: Arc<AtomicU64>,
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(self.bytes, Ordering::Relaxed);
    }
}

impl ResourceGuard {
    pub fn new(config: ResourceGuardConfig) -> Self {
        Self {
            requests: Arc::new(Semaphore::new(config.max_concurrent_requests)),
            batches: Arc::new(Semaphore::new(config.max_concurrent_batches)),
            batch_tokens: Arc::new(TokenBucket::new(config.batch_rate_limit)),
            in_flight_bytes: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Admits a single-item request of `body_bytes` size, or rejects it
    /// with `ResourceProtection` without ever reaching the semaphore if
    /// the body itself is over the configured ceiling.
    pub async fn admit_request(&self, body_bytes: usize) -> Result<RequestGuard<'_>, Error> {
        if body_bytes > self.config.max_request_body_bytes {
            return Err(Error::ResourceProtection(format!(
                "request body of {body_bytes} bytes exceeds the configured limit of {}",
                self.config.max_request_body_bytes
            )));
        }

        let permit = self
            .requests
            .try_acquire()
            .map_err(|_| Error::ResourceProtection("too many concurrent requests in flight".to_string()))?;

        self.in_flight_bytes.fetch_add(body_bytes as u64, Ordering::Relaxed);
        Ok(RequestGuard { _permit: permit, bytes: body_bytes as u64, counter: self.in_flight_bytes.clone() })
    }

    /// Admits one batch operation (one BatchGet/BatchWrite/TransactWrite
    /// call, not one chunk of it), consuming `chunk_count` tokens from the
    /// rate limiter -- one token per chunk the executor is about to issue.
    pub fn admit_batch(&self, chunk_count: u64) -> Result<BatchGuard<'_>, Error> {
        if !self.batch_tokens.try_acquire(chunk_count.max(1)) {
            return Err(Error::ResourceProtection("batch rate limit exceeded".to_string()));
        }
        let permit = self
            .batches
            .try_acquire()
            .map_err(|_| Error::ResourceProtection("too many concurrent batch operations in flight".to_string()))?;
        Ok(BatchGuard { _permit: permit })
    }

    pub fn in_flight_bytes(&self) -> u64 {
        self.in_flight_bytes.load(Ordering::Relaxed)
    }
}

pub struct BatchGuard<'a> {
    _permit: SemaphorePermit<'a>,
}

/// Derives the remaining time budget from a serverless invocation
/// deadline, if one was attached to the caller's context, minus a safety
/// margin so the request is never issued with essentially no time left to
/// complete.
pub fn remaining_budget(deadline: Option<Instant>, safety_margin: Duration) -> Option<Duration> {
    deadline.map(|d| d.saturating_duration_since(Instant::now()).saturating_sub(safety_margin))
}
