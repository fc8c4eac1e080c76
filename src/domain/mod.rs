//! Domain types used throughout the client.
//!
//! This module defines:
//!
//! - price observations and tracked items (`Observation`, `Item`)
//! - the in-memory snapshot of the collection (`ItemsSnapshot`)
//! - client configuration (`ClientConfig`)

pub mod types;

pub use types::*;
