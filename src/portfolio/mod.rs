//! Derived portfolio views.
//!
//! Everything here is computed on demand from the current snapshot; nothing
//! is stored. The dashboard recomputes these after every snapshot reload.

use chrono::NaiveDateTime;

use crate::domain::Item;

pub mod aggregate;
pub mod trend;

pub use aggregate::aggregate_series;
pub use trend::{trend, Trend, TrendDirection};

/// Headline dashboard numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// Sum of each item's current price.
    pub total_value: f64,
    pub item_count: usize,
    /// Timestamp of the newest observation across all items, if any.
    pub last_check: Option<NaiveDateTime>,
}

/// Compute the headline numbers for the whole collection.
pub fn summarize(items: &[Item]) -> Summary {
    let total_value = items.iter().map(|i| i.price).sum();
    let last_check = items
        .iter()
        .flat_map(|i| i.history.iter())
        .map(|o| o.at)
        .max();
    Summary {
        total_value,
        item_count: items.len(),
        last_check,
    }
}

/// One price-check event in the activity feed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEvent {
    pub item_id: u64,
    pub item_name: String,
    pub at: NaiveDateTime,
    pub price: f64,
    pub url: Option<String>,
}

/// Every observation across all items, newest first.
pub fn activity_feed(items: &[Item]) -> Vec<ActivityEvent> {
    let mut events: Vec<ActivityEvent> = items
        .iter()
        .flat_map(|item| {
            item.history.iter().map(|o| ActivityEvent {
                item_id: item.id,
                item_name: item.name.clone(),
                at: o.at,
                price: o.price,
                url: o.url.clone(),
            })
        })
        .collect();
    events.sort_by(|a, b| b.at.cmp(&a.at));
    events
}

/// Items whose name or category matches the search term.
pub fn filter_items<'a>(items: &'a [Item], search: &str) -> Vec<&'a Item> {
    items.iter().filter(|i| i.matches(search)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn item(id: u64, name: &str, price: f64, history: Vec<Observation>) -> Item {
        Item {
            id,
            name: name.to_string(),
            category: None,
            price,
            exclude_keywords: None,
            active_listing_url: None,
            history,
        }
    }

    #[test]
    fn summary_totals_and_last_check() {
        let items = vec![
            item(1, "A", 120.0, vec![Observation::new(at(2), 120.0)]),
            item(2, "B", 80.0, vec![Observation::new(at(7), 80.0)]),
            item(3, "C", 0.0, Vec::new()),
        ];
        let summary = summarize(&items);
        assert_eq!(summary.item_count, 3);
        assert!((summary.total_value - 200.0).abs() < 1e-9);
        assert_eq!(summary.last_check, Some(at(7)));
    }

    #[test]
    fn summary_of_empty_collection() {
        let summary = summarize(&[]);
        assert_eq!(summary.item_count, 0);
        assert_eq!(summary.total_value, 0.0);
        assert_eq!(summary.last_check, None);
    }

    #[test]
    fn activity_feed_is_newest_first() {
        let items = vec![
            item(1, "A", 0.0, vec![Observation::new(at(1), 10.0)]),
            item(
                2,
                "B",
                0.0,
                vec![Observation::new(at(5), 50.0), Observation::new(at(3), 30.0)],
            ),
        ];
        let feed = activity_feed(&items);
        assert_eq!(feed.len(), 3);
        assert_eq!(feed[0].item_name, "B");
        assert_eq!(feed[0].price, 50.0);
        assert_eq!(feed[2].price, 10.0);
    }

    #[test]
    fn filter_items_by_name() {
        let items = vec![
            item(1, "Astro Racer", 0.0, Vec::new()),
            item(2, "Moon Buggy", 0.0, Vec::new()),
        ];
        let hits = filter_items(&items, "astro");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 1);
        assert_eq!(filter_items(&items, "").len(), 2);
    }
}
