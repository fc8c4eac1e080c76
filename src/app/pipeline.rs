//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! snapshot fetch -> summary -> aggregate series -> activity feed
//!
//! The CLI and the TUI can then focus on presentation (printing vs
//! widgets).

use crate::api::ApiClient;
use crate::domain::{ItemsSnapshot, Observation};
use crate::error::AppError;
use crate::portfolio::{self, ActivityEvent, Summary};

/// Everything the dashboard derives from one snapshot.
#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub summary: Summary,
    /// Portfolio-wide value over time.
    pub aggregate: Vec<Observation>,
    /// All recorded price checks, newest first.
    pub activity: Vec<ActivityEvent>,
}

/// Fetch a fresh snapshot and derive the dashboard model from it.
pub fn load_dashboard(client: &ApiClient) -> Result<(ItemsSnapshot, DashboardModel), AppError> {
    let snapshot = client.fetch_items()?;
    let model = build_model(&snapshot);
    Ok((snapshot, model))
}

/// Derive the dashboard model from an existing snapshot.
///
/// This is useful for the TUI when the view changes without a reload.
pub fn build_model(snapshot: &ItemsSnapshot) -> DashboardModel {
    DashboardModel {
        summary: portfolio::summarize(&snapshot.items),
        aggregate: portfolio::aggregate_series(&snapshot.items),
        activity: portfolio::activity_feed(&snapshot.items),
    }
}
