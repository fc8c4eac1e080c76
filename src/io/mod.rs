//! Input/output helpers.
//!
//! - standalone SVG chart rendering (`svg`)
//! - activity feed CSV export (`export`)

pub mod export;
pub mod svg;

pub use export::*;
pub use svg::*;
