//! Standalone SVG rendering of chart geometry.
//!
//! This is a presentation adapter: the projector computes coordinates, and
//! this module only binds them to SVG markup. It mirrors what the
//! service's web dashboard draws: a filled area under the price line with
//! labeled, dashed gridlines.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::chart::ChartGeometry;
use crate::error::AppError;

const LINE_COLOR: &str = "#3b82f6";
const GRID_COLOR: &str = "#334155";
const LABEL_COLOR: &str = "#64748b";

/// Write a chart as a standalone SVG file.
pub fn write_chart_svg(path: &Path, geometry: &ChartGeometry, title: &str) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create SVG file '{}': {e}", path.display()),
        )
    })?;
    file.write_all(render_svg(geometry, title).as_bytes())
        .map_err(|e| AppError::new(2, format!("Failed to write SVG: {e}")))?;
    Ok(())
}

/// Render chart geometry as an SVG document.
pub fn render_svg(geometry: &ChartGeometry, title: &str) -> String {
    let w = geometry.width;
    let h = geometry.height;
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 {w:.0} {h:.0}\" \
         width=\"{w:.0}\" height=\"{h:.0}\">\n"
    ));
    out.push_str(&format!("  <title>{}</title>\n", escape_text(title)));

    for gl in &geometry.gridlines {
        let x1 = geometry.margins.left;
        let x2 = w - geometry.margins.right;
        out.push_str(&format!(
            "  <line x1=\"{x1:.2}\" y1=\"{:.2}\" x2=\"{x2:.2}\" y2=\"{:.2}\" \
             stroke=\"{GRID_COLOR}\" stroke-dasharray=\"4 4\"/>\n",
            gl.y, gl.y
        ));
        out.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-size=\"10\" \
             fill=\"{LABEL_COLOR}\">{}</text>\n",
            x1 - 10.0,
            gl.y + 4.0,
            escape_text(&gl.label)
        ));
    }

    out.push_str(&format!(
        "  <path d=\"{}\" fill=\"{LINE_COLOR}\" fill-opacity=\"0.2\" stroke=\"none\"/>\n",
        polygon_path(&geometry.area)
    ));
    out.push_str(&format!(
        "  <path d=\"{}\" fill=\"none\" stroke=\"{LINE_COLOR}\" stroke-width=\"3\"/>\n",
        polyline_path(&geometry.line)
    ));

    out.push_str("</svg>\n");
    out
}

fn polyline_path(points: &[(f64, f64)]) -> String {
    let mut d = String::new();
    for (i, &(x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{cmd} {x:.2} {y:.2} "));
    }
    d.trim_end().to_string()
}

fn polygon_path(points: &[(f64, f64)]) -> String {
    format!("{} Z", polyline_path(points))
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{project, Margins};
    use crate::domain::Observation;
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
    fn svg_contains_line_area_and_labels() {
        let series = vec![obs(1, 900.0), obs(2, 1500.0), obs(3, 1200.0)];
        let geometry = project(&series, 400.0, 200.0, Margins::DASHBOARD).unwrap();
        let svg = render_svg(&geometry, "Tin Rocket");

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<title>Tin Rocket</title>"));
        assert_eq!(svg.matches("<line ").count(), 5);
        assert_eq!(svg.matches("<text ").count(), 5);
        assert!(svg.contains("£"));
        // Fill polygon closes; price line does not.
        assert_eq!(svg.matches(" Z\"").count(), 1);
    }

    #[test]
    fn titles_are_escaped() {
        let geometry = project(&[obs(1, 10.0)], 400.0, 200.0, Margins::DASHBOARD).unwrap();
        let svg = render_svg(&geometry, "Cups & <Saucers>");
        assert!(svg.contains("Cups &amp; &lt;Saucers&gt;"));
    }
}
