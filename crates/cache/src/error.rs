//! Typed error enum for the cache crate.

use std::sync::Arc;

use procura_core::Partition;
use procura_transport::TransportError;
use thiserror::Error;

/// Errors surfaced to cache callers.
///
/// Cloneable because one underlying fetch failure fans out to every
/// coalesced waiter.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("fetch failed for partition {partition}: {source}")]
    Fetch {
        partition: Partition,
        #[source]
        source: Arc<TransportError>,
    },
}

impl CacheError {
    /// Partition whose fetch failed.
    #[must_use]
    pub fn partition(&self) -> &Partition {
        match self {
            Self::Fetch { partition, .. } => partition,
        }
    }

    /// Underlying transport failure.
    #[must_use]
    pub fn transport(&self) -> &TransportError {
        match self {
            Self::Fetch { source, .. } => source,
        }
    }

    /// Whether a retry might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.transport().is_transient()
    }
}
