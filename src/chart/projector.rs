//! Timeline projection: map a price series onto viewport pixel coordinates.
//!
//! The projector produces a polyline for the price line, a closed polygon
//! for the fill area beneath it, and labeled horizontal gridlines. It is a
//! pure function of its arguments; callers own fetching and rendering.

use crate::domain::Observation;

/// Number of horizontal gridlines (and axis labels) per chart.
pub const GRIDLINE_COUNT: usize = 5;

/// Fractional padding applied to the vertical domain so extremes are not
/// drawn flush against the plot edge.
const VERTICAL_PAD: f64 = 0.05;

/// Space reserved inside the viewport for axis labels. Not used for
/// plotting data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    /// Margins used by the dashboard's full-size charts.
    pub const DASHBOARD: Margins = Margins {
        top: 20.0,
        right: 20.0,
        bottom: 30.0,
        left: 50.0,
    };
}

/// A horizontal gridline with its formatted axis label.
#[derive(Debug, Clone, PartialEq)]
pub struct Gridline {
    pub y: f64,
    pub value: f64,
    pub label: String,
}

/// Drawable output of [`project`].
#[derive(Debug, Clone)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// Polyline vertices for the price line, one per plotted point.
    pub line: Vec<(f64, f64)>,
    /// Closed fill polygon: the line vertices plus the two baseline corners.
    pub area: Vec<(f64, f64)>,
    pub gridlines: Vec<Gridline>,
    /// Padded value domain `[min, max]` backing the vertical scale.
    pub value_range: [f64; 2],
}

/// Project a series of observations into a `width` × `height` viewport.
///
/// Returns `None` when there is nothing to draw (empty series, or no finite
/// values, or a viewport too small for the margins); the caller renders a
/// placeholder instead.
///
/// A single observation is duplicated into a flat two-point line so the
/// horizontal spacing step always has at least two points to interpolate
/// between.
///
/// Points are spaced evenly by index, not by elapsed time: position `i` of
/// `n` maps to `left + (i / (n-1)) * plot_width`. Irregularly sampled
/// series therefore render with a distorted time axis. Keep it that way;
/// the even spacing is what the dashboard has always shown.
pub fn project(
    series: &[Observation],
    width: f64,
    height: f64,
    margins: Margins,
) -> Option<ChartGeometry> {
    if series.is_empty() {
        return None;
    }

    let plot_width = width - margins.left - margins.right;
    let plot_height = height - margins.top - margins.bottom;
    if !(plot_width.is_finite() && plot_height.is_finite() && plot_width > 0.0 && plot_height > 0.0)
    {
        return None;
    }

    // Positional operations require time order; sort a local copy and leave
    // the input untouched.
    let mut sorted: Vec<&Observation> = series.iter().collect();
    sorted.sort_by_key(|o| o.at);

    let mut values: Vec<f64> = sorted
        .iter()
        .map(|o| o.price)
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        return None;
    }
    if values.len() == 1 {
        let only = values[0];
        values.push(only);
    }

    let raw_min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let raw_max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min_value = raw_min * (1.0 - VERTICAL_PAD);
    let max_value = raw_max * (1.0 + VERTICAL_PAD);
    let range = max_value - min_value;

    let n = values.len();
    let x_at = |i: usize| margins.left + (i as f64 / (n - 1) as f64) * plot_width;
    // A zero range only happens for an all-zero series (the 5% pad separates
    // any other flat series); render it flat at mid-height rather than
    // dividing by zero.
    let y_at = |v: f64| {
        if range > 0.0 {
            margins.top + plot_height - ((v - min_value) / range) * plot_height
        } else {
            margins.top + plot_height / 2.0
        }
    };

    let line: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| (x_at(i), y_at(v)))
        .collect();

    let baseline = height - margins.bottom;
    let mut area = Vec::with_capacity(line.len() + 2);
    area.extend_from_slice(&line);
    area.push((x_at(n - 1), baseline));
    area.push((x_at(0), baseline));

    let step = range / (GRIDLINE_COUNT - 1) as f64;
    let mut gridlines = Vec::with_capacity(GRIDLINE_COUNT);
    for i in 0..GRIDLINE_COUNT {
        let value = min_value + i as f64 * step;
        gridlines.push(Gridline {
            y: y_at(value),
            value,
            label: format_axis_value(value),
        });
    }

    Some(ChartGeometry {
        width,
        height,
        margins,
        line,
        area,
        gridlines,
        value_range: [min_value, max_value],
    })
}

/// Axis label formatting: values from 1000 up are abbreviated with a "k"
/// suffix at one decimal place, everything else is integer-rounded.
pub fn format_axis_value(value: f64) -> String {
    if value >= 1000.0 {
        format!("£{:.1}k", value / 1000.0)
    } else {
        format!("£{value:.0}")
    }
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

    fn margins() -> Margins {
        Margins::DASHBOARD
    }

    #[test]
    fn empty_series_signals_no_data() {
        assert!(project(&[], 400.0, 200.0, margins()).is_none());
        assert!(project(&[], 10.0, 10.0, margins()).is_none());
    }

    #[test]
    fn viewport_smaller_than_margins_signals_no_data() {
        let series = vec![obs(1, 100.0)];
        assert!(project(&series, 40.0, 20.0, margins()).is_none());
    }

    #[test]
    fn single_point_renders_flat_across_full_plot_width() {
        let m = margins();
        let geom = project(&[obs(1, 250.0)], 400.0, 200.0, m).unwrap();
        assert_eq!(geom.line.len(), 2);
        assert!((geom.line[0].0 - m.left).abs() < 1e-9);
        assert!((geom.line[1].0 - (400.0 - m.right)).abs() < 1e-9);
        assert!((geom.line[0].1 - geom.line[1].1).abs() < 1e-9);
    }

    #[test]
    fn vertex_counts_match_point_count() {
        let series: Vec<Observation> = (1..=6).map(|d| obs(d, 100.0 + d as f64)).collect();
        let geom = project(&series, 400.0, 200.0, margins()).unwrap();
        assert_eq!(geom.line.len(), 6);
        assert_eq!(geom.area.len(), 8);
        // The fill polygon closes along the baseline.
        let baseline = 200.0 - margins().bottom;
        assert!((geom.area[6].1 - baseline).abs() < 1e-9);
        assert!((geom.area[7].1 - baseline).abs() < 1e-9);
    }

    #[test]
    fn vertical_padding_keeps_extremes_off_the_edges() {
        let m = margins();
        let series = vec![obs(1, 100.0), obs(2, 300.0), obs(3, 180.0)];
        let geom = project(&series, 400.0, 200.0, m).unwrap();
        let top_edge = m.top;
        let bottom_edge = 200.0 - m.bottom;
        for &(_, y) in &geom.line {
            assert!(y > top_edge, "point touches the top edge: y={y}");
            assert!(y < bottom_edge, "point touches the bottom edge: y={y}");
        }
    }

    #[test]
    fn projection_sorts_by_timestamp_without_mutating_input() {
        let series = vec![obs(3, 300.0), obs(1, 100.0), obs(2, 200.0)];
        let geom = project(&series, 400.0, 200.0, margins()).unwrap();
        // Leftmost vertex must be the earliest (cheapest) observation, which
        // lands lowest on screen.
        let first_y = geom.line[0].1;
        let max_y = geom
            .line
            .iter()
            .map(|&(_, y)| y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((first_y - max_y).abs() < 1e-9);
        assert_eq!(series[0].price, 300.0);
    }

    #[test]
    fn all_zero_series_renders_flat_at_mid_height() {
        let m = margins();
        let geom = project(&[obs(1, 0.0), obs(2, 0.0)], 400.0, 200.0, m).unwrap();
        let plot_height = 200.0 - m.top - m.bottom;
        let mid = m.top + plot_height / 2.0;
        for &(_, y) in &geom.line {
            assert!((y - mid).abs() < 1e-9);
        }
    }

    #[test]
    fn five_gridlines_span_the_padded_range() {
        let geom = project(&[obs(1, 100.0), obs(2, 200.0)], 400.0, 200.0, margins()).unwrap();
        assert_eq!(geom.gridlines.len(), GRIDLINE_COUNT);
        assert!((geom.gridlines[0].value - 95.0).abs() < 1e-9);
        assert!((geom.gridlines[4].value - 210.0).abs() < 1e-9);
        // Gridline y positions descend as values rise.
        for pair in geom.gridlines.windows(2) {
            assert!(pair[1].y < pair[0].y);
        }
    }

    #[test]
    fn axis_labels_abbreviate_thousands() {
        assert_eq!(format_axis_value(1234.0), "£1.2k");
        assert_eq!(format_axis_value(850.0), "£850");
        assert_eq!(format_axis_value(1000.0), "£1.0k");
        assert_eq!(format_axis_value(999.4), "£999");
    }
}
