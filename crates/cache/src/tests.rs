use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use procura_core::{Partition, Record};
use procura_transport::{RecordSource, TransportError};

use crate::{CacheError, ManualClock, MultiSourceLoader, SourceCache};

const TIMEOUT: Duration = Duration::from_secs(300);

/// In-memory source that counts fetches and can be told to fail per
/// partition. Each fetch yields once so it resolves on a later poll, the
/// way a real network round trip would.
#[derive(Default)]
struct FakeSource {
    data: Mutex<HashMap<Partition, Vec<Record>>>,
    failing: Mutex<HashSet<Partition>>,
    fetches: AtomicUsize,
}

impl FakeSource {
    fn with_partition(partition: &Partition, records: Vec<Record>) -> Arc<Self> {
        let source = Arc::new(Self::default());
        source.put(partition, records);
        source
    }

    fn put(&self, partition: &Partition, records: Vec<Record>) {
        self.data.lock().unwrap().insert(partition.clone(), records);
    }

    fn fail(&self, partition: &Partition, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(partition.clone());
        } else {
            set.remove(partition);
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for FakeSource {
    async fn fetch(&self, partition: &Partition) -> Result<Vec<Record>, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing.lock().unwrap().contains(partition) {
            return Err(TransportError::HttpStatus { code: 503, body: "down".to_owned() });
        }
        Ok(self.data.lock().unwrap().get(partition).cloned().unwrap_or_default())
    }
}

fn record(id: &str, status: &str) -> Record {
    Record::from_fields([("ID", id), ("Status", status)])
}

fn cache_with(source: Arc<FakeSource>) -> (SourceCache, ManualClock) {
    let clock = ManualClock::new();
    let cache = SourceCache::with_clock(source, Arc::new(clock.clone()), TIMEOUT);
    (cache, clock)
}

#[tokio::test]
async fn test_concurrent_gets_share_one_fetch() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    let (cache, _clock) = cache_with(Arc::clone(&source));

    let (a, b) = tokio::join!(cache.get(&main), cache.get(&main));
    let a = a.unwrap();
    let b = b.unwrap();

    assert_eq!(source.fetch_count(), 1);
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.len(), 1);
}

#[tokio::test]
async fn test_live_entry_skips_network() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    let (cache, clock) = cache_with(Arc::clone(&source));

    cache.get(&main).await.unwrap();
    clock.advance(TIMEOUT - Duration::from_secs(1));
    cache.get(&main).await.unwrap();
    assert_eq!(source.fetch_count(), 1);
}

#[tokio::test]
async fn test_expired_entry_refetches() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    let (cache, clock) = cache_with(Arc::clone(&source));

    cache.get(&main).await.unwrap();
    clock.advance(TIMEOUT);
    cache.get(&main).await.unwrap();
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn test_invalidate_forces_fresh_fetch() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    let (cache, _clock) = cache_with(Arc::clone(&source));

    cache.get(&main).await.unwrap();
    cache.invalidate(&main);
    let records = cache.get(&main).await.unwrap();
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(records[0].id(), Some("PR-1"));
}

#[tokio::test]
async fn test_refetch_observes_new_data() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    let (cache, _clock) = cache_with(Arc::clone(&source));

    cache.get(&main).await.unwrap();
    source.put(&main, vec![record("PR-1", "approved"), record("PR-2", "pending")]);

    // Still cached: old snapshot.
    let stale = cache.get(&main).await.unwrap();
    assert_eq!(stale.len(), 1);

    cache.invalidate(&main);
    let fresh = cache.get(&main).await.unwrap();
    assert_eq!(fresh.len(), 2);
    assert_eq!(fresh[0].status().unwrap().as_str(), "approved");
}

#[tokio::test]
async fn test_failure_notifies_every_waiter_and_writes_no_entry() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    source.fail(&main, true);
    let (cache, _clock) = cache_with(Arc::clone(&source));

    let (a, b) = tokio::join!(cache.get(&main), cache.get(&main));
    assert_eq!(source.fetch_count(), 1);
    for result in [a, b] {
        let err = result.unwrap_err();
        assert_eq!(err.partition(), &main);
        assert!(err.is_transient());
    }

    // In-flight slot was cleared and nothing was cached: next get fetches
    // again and succeeds once the source recovers.
    source.fail(&main, false);
    let records = cache.get(&main).await.unwrap();
    assert_eq!(source.fetch_count(), 2);
    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_partitions_are_independent() {
    let source = Arc::new(FakeSource::default());
    source.put(&Partition::main(), vec![record("PR-1", "pending")]);
    source.put(&Partition::done(), vec![record("PR-2", "done"), record("PR-3", "done")]);
    let (cache, _clock) = cache_with(Arc::clone(&source));

    let (main_part, done_part) = (Partition::main(), Partition::done());
    let (main, done) = tokio::join!(cache.get(&main_part), cache.get(&done_part));
    assert_eq!(main.unwrap().len(), 1);
    assert_eq!(done.unwrap().len(), 2);
    assert_eq!(source.fetch_count(), 2);

    cache.invalidate(&Partition::main());
    cache.get(&Partition::done()).await.unwrap();
    assert_eq!(source.fetch_count(), 2, "invalidating main must not evict done");
}

#[tokio::test]
async fn test_multi_load_aggregates_partial_failures() {
    let source = Arc::new(FakeSource::default());
    source.put(&Partition::main(), vec![record("PR-1", "pending")]);
    source.put(&Partition::rejected(), vec![record("PR-9", "rejected")]);
    source.fail(&Partition::done(), true);
    let (cache, _clock) = cache_with(Arc::clone(&source));
    let loader = MultiSourceLoader::new(cache);

    let partitions = [Partition::main(), Partition::done(), Partition::rejected()];
    let results = loader.load(&partitions).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[&Partition::main()].as_ref().unwrap().len(), 1);
    assert_eq!(results[&Partition::rejected()].as_ref().unwrap().len(), 1);
    assert!(matches!(
        results[&Partition::done()].as_ref().unwrap_err(),
        CacheError::Fetch { .. }
    ));
}

#[tokio::test]
async fn test_multi_load_duplicate_partitions_fetch_once() {
    let main = Partition::main();
    let source = FakeSource::with_partition(&main, vec![record("PR-1", "pending")]);
    let (cache, _clock) = cache_with(Arc::clone(&source));
    let loader = MultiSourceLoader::new(cache);

    let results = loader.load(&[main.clone(), main.clone()]).await;
    assert_eq!(results.len(), 1);
    assert_eq!(source.fetch_count(), 1);
}
