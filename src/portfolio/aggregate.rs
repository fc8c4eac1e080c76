//! Portfolio-wide value over time.
//!
//! The aggregate series is derived, never stored: at each distinct
//! timestamp appearing in any item's history, the portfolio value is the
//! sum over items of that item's most recent observation at-or-before that
//! timestamp. An item with no qualifying observation contributes 0; its
//! value is unknown until its first price is recorded.

use crate::domain::{Item, Observation};

/// Build the aggregate series for the whole collection.
///
/// The result is sorted ascending by timestamp and its timestamp set is
/// exactly the set of distinct timestamps across all items' histories.
/// Empty histories everywhere produce an empty series.
pub fn aggregate_series(items: &[Item]) -> Vec<Observation> {
    let mut stamps: Vec<_> = items
        .iter()
        .flat_map(|item| item.history.iter().map(|o| o.at))
        .collect();
    stamps.sort();
    stamps.dedup();

    stamps
        .into_iter()
        .map(|at| {
            let total = items
                .iter()
                .map(|item| {
                    item.history
                        .iter()
                        .filter(|o| o.at <= at)
                        .max_by_key(|o| o.at)
                        .map(|o| o.price)
                        .unwrap_or(0.0)
                })
                .sum();
            Observation::new(at, total)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn item(id: u64, history: Vec<Observation>) -> Item {
        Item {
            id,
            name: format!("item-{id}"),
            category: None,
            price: 0.0,
            exclude_keywords: None,
            active_listing_url: None,
            history,
        }
    }

    #[test]
    fn carries_latest_price_forward() {
        let a = item(
            1,
            vec![
                Observation::new(at(1), 10.0),
                Observation::new(at(2), 15.0),
            ],
        );
        let b = item(2, vec![Observation::new(at(1), 5.0)]);

        let agg = aggregate_series(&[a, b]);
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].at, at(1));
        assert!((agg[0].price - 15.0).abs() < 1e-9);
        assert_eq!(agg[1].at, at(2));
        assert!((agg[1].price - 20.0).abs() < 1e-9);
    }

    #[test]
    fn items_without_prior_observations_contribute_zero() {
        let a = item(1, vec![Observation::new(at(5), 100.0)]);
        let b = item(2, vec![Observation::new(at(1), 40.0)]);

        let agg = aggregate_series(&[a, b]);
        // At day 1 only b has a known price.
        assert!((agg[0].price - 40.0).abs() < 1e-9);
        assert!((agg[1].price - 140.0).abs() < 1e-9);
    }

    #[test]
    fn timestamp_set_is_the_union_of_distinct_timestamps() {
        let a = item(
            1,
            vec![Observation::new(at(1), 1.0), Observation::new(at(3), 3.0)],
        );
        let b = item(
            2,
            vec![Observation::new(at(1), 2.0), Observation::new(at(2), 4.0)],
        );

        let agg = aggregate_series(&[a, b]);
        let stamps: Vec<_> = agg.iter().map(|o| o.at).collect();
        assert_eq!(stamps, vec![at(1), at(2), at(3)]);
    }

    #[test]
    fn no_history_means_empty_series() {
        let items = vec![item(1, Vec::new()), item(2, Vec::new())];
        assert!(aggregate_series(&items).is_empty());
    }
}
