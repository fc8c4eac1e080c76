//! Plotters-powered chart widget for Ratatui.
//!
//! The widget is intentionally render-only: it takes the projector's
//! [`ChartGeometry`] and binds it to the terminal buffer via
//! `plotters-ratatui-backend`. All coordinate math lives in the projector,
//! which keeps this adapter small and the projection testable without a
//! terminal.

use plotters::element::Polygon;
use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color as TuiColor, Style},
    widgets::Widget,
};

use crate::chart::ChartGeometry;

pub struct GeometryChart<'a> {
    pub geometry: &'a ChartGeometry,
}

impl<'a> Widget for GeometryChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build
        // a chart. In that case, render a small hint rather than panicking.
        if area.width < 16 || area.height < 4 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(TuiColor::Yellow),
            );
            return;
        }

        let g = self.geometry;
        if !(g.width.is_finite() && g.height.is_finite()) || g.width <= 0.0 || g.height <= 0.0 {
            return;
        }

        let widget = widget_fn(move |root| {
            // The projector's viewport is drawn 1:1 into a cartesian plane
            // covering the full virtual viewport; the backend scales that
            // to the terminal cells.
            let mut chart = ChartBuilder::on(&root)
                .margin(0)
                .build_cartesian_2d(0.0..g.width, 0.0..g.height)?;

            // Geometry y grows downward (screen convention); Plotters y
            // grows upward. Flip on the way in.
            let flip = |(x, y): (f64, f64)| (x, g.height - y);

            let grid_color = RGBColor(90, 90, 90);
            let fill_color = RGBColor(0, 60, 90);
            let line_color = RGBColor(0, 255, 255);

            for gl in &g.gridlines {
                let span = [
                    flip((g.margins.left, gl.y)),
                    flip((g.width - g.margins.right, gl.y)),
                ];
                chart.draw_series(LineSeries::new(span.iter().copied(), &grid_color))?;
            }

            let area_pts: Vec<(f64, f64)> = g.area.iter().map(|&p| flip(p)).collect();
            chart.draw_series(std::iter::once(Polygon::new(area_pts, fill_color.filled())))?;

            chart.draw_series(LineSeries::new(g.line.iter().map(|&p| flip(p)), &line_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
