//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - held in-memory as the dashboard snapshot
//! - fed to the pure chart/portfolio computations
//! - converted to and from the service's wire format in `api::client`

use chrono::NaiveDateTime;

/// One timestamped price record for an item.
///
/// Observations are immutable once recorded; a correction is a delete
/// followed by a re-add. Timestamps are not required to be unique within
/// an item's history.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub at: NaiveDateTime,
    /// Observed price. Finite and non-negative; the API layer drops
    /// anything else during normalization.
    pub price: f64,
    /// Source listing URL, when the server's price check recorded one.
    pub url: Option<String>,
}

impl Observation {
    pub fn new(at: NaiveDateTime, price: f64) -> Self {
        Self {
            at,
            price,
            url: None,
        }
    }
}

/// A tracked collectible item with its price history.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub category: Option<String>,
    /// Current price as maintained by the server. The server keeps this
    /// equal to the newest history entry after each price check.
    pub price: f64,
    /// Comma-separated keywords the server excludes from listing searches
    /// when checking this item's price.
    pub exclude_keywords: Option<String>,
    /// The listing the most recent checked price came from.
    pub active_listing_url: Option<String>,
    /// Price history in server order. Insertion order is irrelevant:
    /// re-sort by timestamp before any positional use.
    pub history: Vec<Observation>,
}

impl Item {
    /// History sorted ascending by timestamp (a copy; the stored order is
    /// whatever the server sent).
    pub fn sorted_history(&self) -> Vec<Observation> {
        let mut sorted = self.history.clone();
        sorted.sort_by_key(|o| o.at);
        sorted
    }

    /// The most recent observation, if any.
    pub fn latest_observation(&self) -> Option<&Observation> {
        self.history.iter().max_by_key(|o| o.at)
    }

    /// Case-insensitive match against name and category, for search filters.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        if self.name.to_lowercase().contains(&needle) {
            return true;
        }
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(&needle))
    }
}

/// The full in-memory snapshot of the item collection.
///
/// Replaced wholesale after each successful fetch. Mutations never patch
/// this incrementally: read-after-write consistency comes from a full
/// re-fetch.
#[derive(Debug, Clone, Default)]
pub struct ItemsSnapshot {
    pub items: Vec<Item>,
}

/// Client configuration resolved from flags and the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the tracking service, without a trailing slash.
    pub api_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn item_with_history(history: Vec<Observation>) -> Item {
        Item {
            id: 1,
            name: "Boxed Astro Racer".to_string(),
            category: Some("Diecast".to_string()),
            price: 0.0,
            exclude_keywords: None,
            active_listing_url: None,
            history,
        }
    }

    #[test]
    fn sorted_history_orders_by_timestamp() {
        let item = item_with_history(vec![
            Observation::new(at(3), 30.0),
            Observation::new(at(1), 10.0),
            Observation::new(at(2), 20.0),
        ]);
        let sorted = item.sorted_history();
        let prices: Vec<f64> = sorted.iter().map(|o| o.price).collect();
        assert_eq!(prices, vec![10.0, 20.0, 30.0]);
        // The stored order is untouched.
        assert_eq!(item.history[0].price, 30.0);
    }

    #[test]
    fn latest_observation_picks_newest() {
        let item = item_with_history(vec![
            Observation::new(at(2), 20.0),
            Observation::new(at(5), 50.0),
            Observation::new(at(1), 10.0),
        ]);
        assert_eq!(item.latest_observation().unwrap().price, 50.0);
    }

    #[test]
    fn matches_is_case_insensitive_over_name_and_category() {
        let item = item_with_history(Vec::new());
        assert!(item.matches(""));
        assert!(item.matches("astro"));
        assert!(item.matches("DIECAST"));
        assert!(!item.matches("vinyl"));
    }
}
