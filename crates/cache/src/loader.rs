use std::collections::HashMap;

use futures_util::future::join_all;
use procura_core::Partition;

use crate::{CacheError, CachedRecords, SourceCache};

/// Keyed join of several partition loads. Failed partitions keep their
/// error so callers can degrade instead of failing the whole join.
pub type MultiLoadResult = HashMap<Partition, Result<CachedRecords, CacheError>>;

/// Fans out over several partitions through one [`SourceCache`] and joins
/// the results once all of them have settled.
#[derive(Debug, Clone)]
pub struct MultiSourceLoader {
    cache: SourceCache,
}

impl MultiSourceLoader {
    pub fn new(cache: SourceCache) -> Self {
        Self { cache }
    }

    #[must_use]
    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    /// Load all `partitions` concurrently.
    ///
    /// Resolves only after every partition has settled. There is no
    /// ordering guarantee between partitions; the join is keyed. Duplicate
    /// partition names collapse to one entry (and, through the cache, to
    /// one fetch).
    pub async fn load(&self, partitions: &[Partition]) -> MultiLoadResult {
        let fetches = partitions.iter().cloned().map(|partition| {
            let cache = self.cache.clone();
            async move {
                let result = cache.get(&partition).await;
                (partition, result)
            }
        });

        let results: MultiLoadResult = join_all(fetches).await.into_iter().collect();
        let failed = results.values().filter(|r| r.is_err()).count();
        if failed > 0 {
            tracing::warn!(
                requested = results.len(),
                failed,
                "multi-partition load completed with failures"
            );
        }
        results
    }
}
