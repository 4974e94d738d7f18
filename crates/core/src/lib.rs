//! Core types for the procura request tracker
//!
//! This crate contains domain types shared across all other crates.

mod actor;
mod constants;
mod env_config;
mod partition;
mod record;
mod status;

pub use actor::*;
pub use constants::*;
pub use env_config::*;
pub use partition::*;
pub use record::*;
pub use status::*;
