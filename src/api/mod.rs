//! REST boundary with the tracking service.

pub mod client;

pub use client::{ApiClient, CheckOutcome};
