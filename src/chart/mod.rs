//! Pure chart computations: series in, drawable geometry out.
//!
//! Nothing in this module touches a terminal or a file. The TUI widget and
//! the SVG writer are thin adapters over [`ChartGeometry`], which keeps the
//! projection logic testable without a rendering environment.

pub mod projector;
pub mod sparkline;

pub use projector::{format_axis_value, project, ChartGeometry, Gridline, Margins, GRIDLINE_COUNT};
pub use sparkline::{sparkline, SPARKLINE_HEIGHT, SPARKLINE_WIDTH};
