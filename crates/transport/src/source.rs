//! Transport seams for reads and writes.

use async_trait::async_trait;
use procura_core::{Partition, Record};

use crate::TransportError;

/// Read channel: fetch all records of one partition.
///
/// Implemented by [`crate::SheetClient`] for the real backend and by
/// in-memory fakes in the cache and service tests.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch(&self, partition: &Partition) -> Result<Vec<Record>, TransportError>;
}

/// Write channel: post one mutation as form fields.
#[async_trait]
pub trait WriteEndpoint: Send + Sync {
    async fn post(&self, form: &[(String, String)]) -> Result<(), TransportError>;
}
