use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use procura_core::{CACHE_TIMEOUT_SECS, Partition, Record, env_duration_secs};
use procura_transport::RecordSource;

use crate::{CacheError, Clock, SystemClock};

/// Immutable snapshot of one partition, shared between the cache and every
/// coalesced caller.
pub type CachedRecords = Arc<Vec<Record>>;

type FetchFuture = Shared<BoxFuture<'static, Result<CachedRecords, CacheError>>>;

struct CacheEntry {
    data: CachedRecords,
    fetched_at: Instant,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<Partition, CacheEntry>,
    in_flight: HashMap<Partition, FetchFuture>,
}

struct CacheState {
    source: Arc<dyn RecordSource>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl CacheState {
    // The lock is only ever held across synchronous sections, never an
    // await, so a poisoned lock means a panic mid-bookkeeping; the maps
    // are still structurally valid and worst case we refetch.
    fn lock_inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Time-bounded per-partition cache with in-flight request coalescing.
///
/// Cheaply cloneable; clones share one cache. Construct once per process
/// and hand to every view and submitter.
#[derive(Clone)]
pub struct SourceCache {
    state: Arc<CacheState>,
}

impl SourceCache {
    /// Cache with the system clock and the configured timeout
    /// (`PROCURA_CACHE_TIMEOUT_SECS`, default 300).
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        let timeout = env_duration_secs("PROCURA_CACHE_TIMEOUT_SECS", CACHE_TIMEOUT_SECS);
        Self::with_clock(source, Arc::new(SystemClock), timeout)
    }

    /// Cache with explicit clock and timeout, for tests and embedders.
    pub fn with_clock(
        source: Arc<dyn RecordSource>,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> Self {
        Self { state: Arc::new(CacheState { source, clock, timeout, inner: Mutex::new(Inner::default()) }) }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.state.timeout
    }

    /// Records of `partition`, from cache when live, otherwise via exactly
    /// one shared fetch.
    ///
    /// Concurrent callers for the same partition coalesce: the first miss
    /// starts the fetch, later callers await the same future, and all of
    /// them observe the identical outcome.
    ///
    /// # Errors
    /// [`CacheError::Fetch`] when the underlying fetch fails. No entry is
    /// written in that case and the in-flight slot is cleared, so the next
    /// call starts a fresh fetch.
    pub async fn get(&self, partition: &Partition) -> Result<CachedRecords, CacheError> {
        let fetch = {
            let mut inner = self.state.lock_inner();

            if let Some(entry) = inner.entries.get(partition) {
                let age = self.state.clock.now().saturating_duration_since(entry.fetched_at);
                if age < self.state.timeout {
                    return Ok(Arc::clone(&entry.data));
                }
                tracing::debug!(partition = %partition, age_secs = age.as_secs(), "cache entry expired");
                inner.entries.remove(partition);
            }

            if let Some(in_flight) = inner.in_flight.get(partition) {
                tracing::debug!(partition = %partition, "joining in-flight fetch");
                in_flight.clone()
            } else {
                let fetch = Self::start_fetch(Arc::clone(&self.state), partition.clone());
                inner.in_flight.insert(partition.clone(), fetch.clone());
                fetch
            }
        };
        fetch.await
    }

    /// Drop the entry for `partition` unconditionally.
    ///
    /// In-flight fetches are unaffected; their result will repopulate the
    /// entry when they land.
    pub fn invalidate(&self, partition: &Partition) {
        let mut inner = self.state.lock_inner();
        if inner.entries.remove(partition).is_some() {
            tracing::debug!(partition = %partition, "cache entry invalidated");
        }
    }

    /// Invalidate several partitions in one critical section.
    pub fn invalidate_many(&self, partitions: &[Partition]) {
        let mut inner = self.state.lock_inner();
        for partition in partitions {
            if inner.entries.remove(partition).is_some() {
                tracing::debug!(partition = %partition, "cache entry invalidated");
            }
        }
    }

    fn start_fetch(state: Arc<CacheState>, partition: Partition) -> FetchFuture {
        async move {
            let result = state.source.fetch(&partition).await;

            // Bookkeeping happens before any waiter resumes: entry written
            // (or slot cleared) in the same synchronous section, so callers
            // never observe a completed fetch without its cache entry.
            let mut inner = state.lock_inner();
            inner.in_flight.remove(&partition);
            match result {
                Ok(records) => {
                    let data: CachedRecords = Arc::new(records);
                    inner.entries.insert(
                        partition.clone(),
                        CacheEntry { data: Arc::clone(&data), fetched_at: state.clock.now() },
                    );
                    tracing::debug!(partition = %partition, count = data.len(), "cache entry stored");
                    Ok(data)
                },
                Err(e) => {
                    tracing::warn!(partition = %partition, error = %e, "fetch failed, notifying all waiters");
                    Err(CacheError::Fetch { partition, source: Arc::new(e) })
                },
            }
        }
        .boxed()
        .shared()
    }
}

impl std::fmt::Debug for SourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.state.lock_inner();
        f.debug_struct("SourceCache")
            .field("timeout", &self.state.timeout)
            .field("entries", &inner.entries.len())
            .field("in_flight", &inner.in_flight.len())
            .finish()
    }
}
