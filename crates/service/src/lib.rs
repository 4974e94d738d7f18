//! Write path and aggregation for the tracker.
//!
//! [`CommandSubmitter`] posts mutations to the backend, invalidates the
//! cache partitions the mutation could have touched, and waits out the
//! backend's consistency lag before the caller reloads. Validation happens
//! before any network call. [`collect_stats`] is the dashboard's
//! multi-partition counter.

mod error;
mod mutation;
mod stats;
mod submitter;

pub use error::ServiceError;
pub use mutation::{RequestDraft, Transition};
pub use stats::{DashboardStats, StatsReport, collect_stats};
pub use submitter::CommandSubmitter;
