//! In-memory TTL cache with single-flight computation.
//!
//! Each key has at most one computation in flight. Concurrent callers for
//! the same missing or expired key await the same shared future, so the
//! upstream call runs once and every caller sees the same result. Only
//! successes are stored; a failure reaches every waiter and leaves no entry.
//!
//! Every computation is driven by its own task, so it runs to completion
//! and fills the cache even when all callers have stopped waiting.
//!
//! The store is bounded. When a new key arrives at capacity the
//! least-recently-used entry is evicted.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::Mutex;
use tokio::time::Instant;

type InFlight<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    last_used: u64,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) < ttl
    }
}

struct CacheState<K, V, E> {
    entries: HashMap<K, CacheEntry<V>>,
    in_flight: HashMap<K, InFlight<V, E>>,
    max_entries: usize,
    clock: u64,
}

impl<K, V, E> CacheState<K, V, E>
where
    K: Eq + Hash + Clone + Debug,
{
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn store(&mut self, key: K, value: V) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_lru();
        }
        let last_used = self.tick();
        self.entries.insert(
            key,
            CacheEntry {
                value,
                created_at: Instant::now(),
                last_used,
            },
        );
    }

    fn evict_lru(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            tracing::debug!(?key, "Evicted least-recently-used cache entry");
        }
    }
}

/// Bounded TTL cache keyed by `K`, memoizing `Result<V, E>` computations.
pub struct TtlCache<K, V, E> {
    state: Arc<Mutex<CacheState<K, V, E>>>,
}

impl<K, V, E> TtlCache<K, V, E>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache holding at most `max_entries` values.
    pub fn new(max_entries: NonZeroUsize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                max_entries: max_entries.get(),
                clock: 0,
            })),
        }
    }

    /// Returns the cached value for `key` if younger than `ttl`, otherwise
    /// runs `compute` (or joins the computation already running for `key`).
    ///
    /// `ttl == 0` always forces a fresh computation. Dropping the returned
    /// future only abandons this caller's wait; the computation keeps going
    /// on its own task. Must be called from within a tokio runtime.
    pub async fn get_or_compute<F, Fut>(&self, key: K, ttl: Duration, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let pending = {
            let mut state = self.state.lock().await;
            let now = Instant::now();
            let tick = state.tick();

            if let Some(entry) = state.entries.get_mut(&key) {
                if entry.is_fresh(ttl, now) {
                    entry.last_used = tick;
                    tracing::debug!(?key, "Cache hit");
                    return Ok(entry.value.clone());
                }
            }

            match state.in_flight.get(&key) {
                Some(pending) => {
                    tracing::debug!(?key, "Joining in-flight computation");
                    pending.clone()
                }
                None => {
                    tracing::debug!(?key, "Cache miss");
                    let pending = self.track(key.clone(), compute());
                    state.in_flight.insert(key, pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// Wraps `fut` so that its completion, not any particular caller,
    /// clears the in-flight slot and stores a successful value. A detached
    /// task polls one clone of the result so progress never depends on a
    /// caller still awaiting it.
    fn track<Fut>(&self, key: K, fut: Fut) -> InFlight<V, E>
    where
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let pending = async move {
            let result = fut.await;
            let mut state = state.lock().await;
            state.in_flight.remove(&key);
            match &result {
                Ok(value) => state.store(key, value.clone()),
                Err(_) => tracing::debug!(?key, "Computation failed, nothing cached"),
            }
            result
        }
        .boxed()
        .shared();

        tokio::spawn(pending.clone());
        pending
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// True if `key` has a stored entry, regardless of age.
    pub async fn contains(&self, key: &K) -> bool {
        self.state.lock().await.entries.contains_key(key)
    }

    /// Drops the entry for `key`. An in-flight computation is not affected.
    pub async fn invalidate(&self, key: &K) {
        self.state.lock().await.entries.remove(key);
    }

    /// Drops all entries.
    pub async fn clear(&self) {
        self.state.lock().await.entries.clear();
    }

    pub async fn max_entries(&self) -> usize {
        self.state.lock().await.max_entries
    }
}
