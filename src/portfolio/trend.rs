//! Price-movement indicator for a single item.

use crate::domain::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    /// Arrow glyph for list rows and tables.
    pub fn arrow(self) -> &'static str {
        match self {
            TrendDirection::Up => "▲",
            TrendDirection::Down => "▼",
            TrendDirection::Flat => "▬",
        }
    }
}

/// Movement between an item's two most recent observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Trend {
    pub direction: TrendDirection,
    /// Percentage change from the previous observation. `None` when the
    /// previous price was zero and the change is therefore unbounded.
    pub pct_change: Option<f64>,
}

/// Compute the trend from the two most recent observations (by time).
///
/// Returns `None` with fewer than two observations; a single price has no
/// direction.
pub fn trend(series: &[Observation]) -> Option<Trend> {
    if series.len() < 2 {
        return None;
    }
    let mut sorted: Vec<&Observation> = series.iter().collect();
    sorted.sort_by_key(|o| o.at);

    let current = sorted[sorted.len() - 1].price;
    let prev = sorted[sorted.len() - 2].price;

    let direction = if current > prev {
        TrendDirection::Up
    } else if current < prev {
        TrendDirection::Down
    } else {
        TrendDirection::Flat
    };

    // A zero previous price makes the percentage unbounded; keep the
    // direction and omit the number instead of surfacing infinity.
    let pct_change = if prev == 0.0 {
        if current == 0.0 { Some(0.0) } else { None }
    } else {
        Some((current - prev) / prev * 100.0)
    };

    Some(Trend {
        direction,
        pct_change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn obs(day: u32, price: f64) -> Observation {
        Observation::new(
            NaiveDate::from_ymd_opt(2025, 7, day)
                .unwrap()
                .and_hms_opt(14, 0, 0)
                .unwrap(),
            price,
        )
    }

    #[test]
    fn rising_price_trends_up() {
        let t = trend(&[obs(1, 100.0), obs(2, 120.0)]).unwrap();
        assert_eq!(t.direction, TrendDirection::Up);
        assert!((t.pct_change.unwrap() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn unchanged_price_is_flat() {
        let t = trend(&[obs(1, 100.0), obs(2, 100.0)]).unwrap();
        assert_eq!(t.direction, TrendDirection::Flat);
        assert!((t.pct_change.unwrap() - 0.0).abs() < 1e-9);
    }

    #[test]
    fn falling_price_trends_down() {
        let t = trend(&[obs(1, 200.0), obs(2, 150.0)]).unwrap();
        assert_eq!(t.direction, TrendDirection::Down);
        assert!((t.pct_change.unwrap() + 25.0).abs() < 1e-9);
    }

    #[test]
    fn single_observation_is_insufficient() {
        assert!(trend(&[]).is_none());
        assert!(trend(&[obs(1, 100.0)]).is_none());
    }

    #[test]
    fn uses_the_two_most_recent_by_time_regardless_of_order() {
        // Stored out of order: newest first.
        let t = trend(&[obs(3, 90.0), obs(1, 50.0), obs(2, 100.0)]).unwrap();
        assert_eq!(t.direction, TrendDirection::Down);
        assert!((t.pct_change.unwrap() + 10.0).abs() < 1e-9);
    }

    #[test]
    fn zero_previous_price_keeps_output_finite() {
        let t = trend(&[obs(1, 0.0), obs(2, 50.0)]).unwrap();
        assert_eq!(t.direction, TrendDirection::Up);
        assert_eq!(t.pct_change, None);

        let t = trend(&[obs(1, 0.0), obs(2, 0.0)]).unwrap();
        assert_eq!(t.direction, TrendDirection::Flat);
        assert_eq!(t.pct_change, Some(0.0));
    }
}
