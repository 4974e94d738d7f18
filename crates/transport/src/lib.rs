//! Read/write channel between the tracker and the spreadsheet backend.
//!
//! The remote API reads with `GET ?action=read&sheet=<name>` returning a
//! JSON array of records, and writes with a form-encoded `POST`. The
//! legacy script-injection transport is gone; this is a plain
//! request/response client behind the [`RecordSource`] and
//! [`WriteEndpoint`] seams so the cache and service layers can be tested
//! against in-memory fakes.

mod client;
mod error;
mod source;

pub use client::SheetClient;
pub use error::TransportError;
pub use source::{RecordSource, WriteEndpoint};

#[cfg(test)]
mod tests;
