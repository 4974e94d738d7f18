//! Partition cache and multi-partition loader.
//!
//! One [`SourceCache`] instance is constructed per process and shared by
//! reference with every view. Entries live for a fixed timeout, evaluated
//! lazily at lookup. Concurrent requests for the same partition coalesce
//! into a single fetch; every coalesced caller observes the identical
//! result, success or failure.

mod clock;
mod error;
mod loader;
mod source_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CacheError;
pub use loader::{MultiLoadResult, MultiSourceLoader};
pub use source_cache::{CachedRecords, SourceCache};

#[cfg(test)]
mod tests;
