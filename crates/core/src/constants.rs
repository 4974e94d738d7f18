//! Shared constants for procura.
//!
//! Centralizes magic numbers so the crates agree on timings and sizes.

/// Cache entry lifetime in seconds (5 minutes).
pub const CACHE_TIMEOUT_SECS: u64 = 300;

/// Delay before reloading a view after a confirmed write, to tolerate
/// eventual-consistency lag in the backing spreadsheet.
pub const RELOAD_DELAY_MS: u64 = 500;

/// Rows produced per render batch.
pub const RENDER_BATCH_SIZE: usize = 50;

/// Page capacity when a view does not override it.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// HTTP request timeout in seconds for both reads and writes.
pub const HTTP_TIMEOUT_SECS: u64 = 30;
