//! Compressed preview charts for the item list.
//!
//! A sparkline is the projector's little sibling: the tail of a series in a
//! fixed small viewport, with no margins, gridlines, or labels. Only the
//! line path is produced.

use crate::domain::Observation;

pub const SPARKLINE_WIDTH: f64 = 120.0;
pub const SPARKLINE_HEIGHT: f64 = 30.0;

/// How many of the most recent observations a sparkline shows.
const SPARKLINE_POINTS: usize = 10;

/// Project the tail of a series into the fixed 120×30 viewport.
///
/// Returns `None` when fewer than two usable observations exist; a preview
/// of a single point has nothing to say.
pub fn sparkline(series: &[Observation]) -> Option<Vec<(f64, f64)>> {
    let mut sorted: Vec<&Observation> = series.iter().filter(|o| o.price.is_finite()).collect();
    if sorted.len() < 2 {
        return None;
    }
    sorted.sort_by_key(|o| o.at);

    let tail = &sorted[sorted.len().saturating_sub(SPARKLINE_POINTS)..];
    let min = tail.iter().map(|o| o.price).fold(f64::INFINITY, f64::min);
    let max = tail
        .iter()
        .map(|o| o.price)
        .fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    let n = tail.len();
    let path = tail
        .iter()
        .enumerate()
        .map(|(i, o)| {
            let x = (i as f64 / (n - 1) as f64) * SPARKLINE_WIDTH;
            // Flat tail: draw at mid-height instead of dividing by zero.
            let y = if range > 0.0 {
                SPARKLINE_HEIGHT - ((o.price - min) / range) * SPARKLINE_HEIGHT
            } else {
                SPARKLINE_HEIGHT / 2.0
            };
            (x, y)
        })
        .collect();

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32, price: f64) -> Observation {
        Observation::new(
            NaiveDate::from_ymd_opt(2025, 4, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            price,
        )
    }

    #[test]
    fn fewer_than_two_points_yields_nothing() {
        assert!(sparkline(&[]).is_none());
        assert!(sparkline(&[obs(1, 42.0)]).is_none());
    }

    #[test]
    fn uses_at_most_the_last_ten_points() {
        let series: Vec<Observation> = (1..=15).map(|d| obs(d, d as f64)).collect();
        let path = sparkline(&series).unwrap();
        assert_eq!(path.len(), 10);
        // First plotted point is day 6 (value 6), the minimum of the tail,
        // so it sits at the bottom edge.
        assert!((path[0].1 - SPARKLINE_HEIGHT).abs() < 1e-9);
        // Last plotted point is the tail maximum, at the top edge.
        let last = path.last().unwrap();
        assert!((last.0 - SPARKLINE_WIDTH).abs() < 1e-9);
        assert!(last.1.abs() < 1e-9);
    }

    #[test]
    fn flat_tail_renders_at_mid_height() {
        let series = vec![obs(1, 75.0), obs(2, 75.0), obs(3, 75.0)];
        let path = sparkline(&series).unwrap();
        for &(_, y) in &path {
            assert!((y - SPARKLINE_HEIGHT / 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn points_are_spaced_by_index() {
        let series = vec![obs(1, 10.0), obs(5, 20.0), obs(6, 30.0)];
        let path = sparkline(&series).unwrap();
        assert!((path[1].0 - SPARKLINE_WIDTH / 2.0).abs() < 1e-9);
    }
}
