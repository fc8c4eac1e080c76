//! Ratatui-based terminal dashboard.
//!
//! Two views: the dashboard (summary header, portfolio or per-item chart,
//! item list) and the activity feed. Every mutation goes through the REST
//! client and is followed by a full snapshot reload; a failed call keeps
//! the previous snapshot on screen and reports through the status line.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::api::ApiClient;
use crate::app::pipeline::{self, DashboardModel};
use crate::chart::{self, ChartGeometry, Margins};
use crate::domain::{Item, ItemsSnapshot, Observation};
use crate::error::AppError;
use crate::portfolio;
use crate::report;

mod geometry_chart;

use geometry_chart::GeometryChart;

/// Virtual viewport the projector renders into; the chart widget scales it
/// to whatever terminal area is available.
const CHART_WIDTH: f64 = 640.0;
const CHART_HEIGHT: f64 = 320.0;

/// Start the TUI.
pub fn run(client: ApiClient) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Dashboard,
    Activity,
}

struct App {
    client: ApiClient,
    snapshot: ItemsSnapshot,
    model: Option<DashboardModel>,
    view: View,
    selected: usize,
    /// Item whose history fills the chart; `None` charts the portfolio
    /// aggregate.
    chart_item: Option<u64>,
    search: String,
    editing_search: bool,
    status: String,
}

impl App {
    fn new(client: ApiClient) -> Self {
        let mut app = Self {
            client,
            snapshot: ItemsSnapshot::default(),
            model: None,
            view: View::Dashboard,
            selected: 0,
            chart_item: None,
            search: String::new(),
            editing_search: false,
            status: "Loading items...".to_string(),
        };
        app.reload();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Replace the snapshot with a fresh fetch. On failure the previous
    /// snapshot stays on screen and the error lands in the status line.
    fn reload(&mut self) {
        match pipeline::load_dashboard(&self.client) {
            Ok((snapshot, model)) => {
                self.snapshot = snapshot;
                self.model = Some(model);
                self.clamp_selection();
                self.status = format!("Loaded {} items.", self.snapshot.items.len());
            }
            Err(err) => {
                self.status = format!("Load failed: {err}");
            }
        }
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_search {
            self.handle_search_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('a') => {
                self.view = match self.view {
                    View::Dashboard => View::Activity,
                    View::Activity => View::Dashboard,
                };
            }
            KeyCode::Up => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down => {
                let n = self.filtered_items().len();
                if n > 0 && self.selected < n - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some((id, name)) = self.selected_item().map(|i| (i.id, i.name.clone())) {
                    self.chart_item = Some(id);
                    self.status = format!("Charting {name}.");
                }
            }
            KeyCode::Esc => {
                if self.chart_item.take().is_some() {
                    self.status = "Charting portfolio value.".to_string();
                }
            }
            KeyCode::Char('/') => {
                self.editing_search = true;
                self.status = "Filtering (type to match name/category, Enter to apply, Esc to cancel).".to_string();
            }
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('c') => self.check_all(),
            KeyCode::Char('p') => self.check_selected(),
            KeyCode::Char('x') => self.delete_selected(),
            _ => {}
        }

        false
    }

    fn handle_search_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_search = false;
                self.search.clear();
                self.clamp_selection();
                self.status = "Filter cleared.".to_string();
            }
            KeyCode::Enter => {
                self.editing_search = false;
                self.status = if self.search.is_empty() {
                    "Filter cleared.".to_string()
                } else {
                    format!("Filtering on \"{}\".", self.search)
                };
            }
            KeyCode::Backspace => {
                self.search.pop();
                self.clamp_selection();
            }
            KeyCode::Char(c) => {
                self.search.push(c);
                self.clamp_selection();
            }
            _ => {}
        }
    }

    fn check_all(&mut self) {
        self.status = "Checking prices...".to_string();
        match self.client.check_all() {
            Ok(results) => {
                self.reload();
                self.status = format!("Price check complete ({} items).", results.len());
            }
            Err(err) => {
                self.status = format!("Price check failed: {err}");
            }
        }
    }

    fn check_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            self.status = "No item selected.".to_string();
            return;
        };
        let (id, name) = (item.id, item.name.clone());
        match self.client.check_item(id) {
            Ok(outcome) if outcome.success => {
                self.reload();
                self.status = match outcome.price {
                    Some(price) => {
                        format!("Checked {name}: {}.", report::format_currency(price))
                    }
                    None => format!("Checked {name}."),
                };
            }
            Ok(outcome) => {
                self.status = format!("Check failed for {name}: {}.", outcome.status);
            }
            Err(err) => {
                self.status = format!("Check failed for {name}: {err}");
            }
        }
    }

    fn delete_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            self.status = "No item selected.".to_string();
            return;
        };
        let (id, name) = (item.id, item.name.clone());
        match self.client.delete_item(id) {
            Ok(()) => {
                if self.chart_item == Some(id) {
                    self.chart_item = None;
                }
                self.reload();
                self.status = format!("Deleted {name}.");
            }
            Err(err) => {
                self.status = format!("Delete failed for {name}: {err}");
            }
        }
    }

    fn filtered_items(&self) -> Vec<&Item> {
        portfolio::filter_items(&self.snapshot.items, &self.search)
    }

    fn selected_item(&self) -> Option<&Item> {
        self.filtered_items().get(self.selected).copied()
    }

    fn clamp_selection(&mut self) {
        let n = self.filtered_items().len();
        if self.selected >= n {
            self.selected = n.saturating_sub(1);
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.view {
            View::Dashboard => self.draw_dashboard(frame, chunks[1]),
            View::Activity => self.draw_activity(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("curio", Style::default().fg(Color::Cyan)),
            Span::raw(" — collectibles dashboard"),
        ]));

        if let Some(model) = &self.model {
            let last = match model.summary.last_check {
                Some(at) => report::format_datetime(at),
                None => "never".to_string(),
            };
            let filter = if self.search.is_empty() {
                String::new()
            } else {
                format!(" | filter: \"{}\"", self.search)
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "value: {} | items: {} | last check: {last}{filter}",
                    report::format_currency(model.summary.total_value),
                    model.summary.item_count,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_dashboard(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(12)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_items(frame, chunks[1]);
    }

    fn chart_series(&self, model: &DashboardModel) -> (Vec<Observation>, String) {
        if let Some(id) = self.chart_item {
            if let Some(item) = self.snapshot.items.iter().find(|i| i.id == id) {
                return (item.sorted_history(), item.name.clone());
            }
        }
        (model.aggregate.clone(), "Portfolio value".to_string())
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let (series, title) = match &self.model {
            Some(model) => self.chart_series(model),
            None => (Vec::new(), "Portfolio value".to_string()),
        };

        let block = Block::default().title(title).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(geometry) =
            chart::project(&series, CHART_WIDTH, CHART_HEIGHT, Margins::DASHBOARD)
        else {
            let msg = Paragraph::new("No price history yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let (chart_rect, insets) = chart_layout(inner);
        frame.render_widget(
            GeometryChart {
                geometry: &geometry,
            },
            chart_rect,
        );
        if let Some(insets) = insets {
            draw_gridline_labels(frame, inner, chart_rect, insets, &geometry);
        }
    }

    fn draw_items(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let filtered = self.filtered_items();

        let items: Vec<ListItem> = filtered
            .iter()
            .map(|item| {
                let trend = portfolio::trend(&item.history);
                let spark = chart::sparkline(&item.history)
                    .map(|path| report::sparkline_glyphs(&path))
                    .unwrap_or_default();
                ListItem::new(format!(
                    "{:<24} {:>12} {:>9} {:<10} {}",
                    truncate_cell(&item.name, 24),
                    report::format_currency(item.price),
                    report::format_trend(trend.as_ref()),
                    spark,
                    item.category.as_deref().unwrap_or(""),
                ))
            })
            .collect();

        let title = format!("Items ({})", filtered.len());
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        if !filtered.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_search {
            let hint = Paragraph::new(format!("filter: {}_", self.search))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_activity(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Activity").borders(Borders::ALL);

        let Some(model) = &self.model else {
            frame.render_widget(block, area);
            return;
        };

        let rows: Vec<ListItem> = model
            .activity
            .iter()
            .take(area.height as usize)
            .map(|event| {
                ListItem::new(format!(
                    "{:<18} {:<24} {:>12}",
                    report::format_datetime(event.at),
                    truncate_cell(&event.item_name, 24),
                    report::format_currency(event.price),
                ))
            })
            .collect();

        if rows.is_empty() {
            let msg = Paragraph::new("No activity recorded yet.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        frame.render_widget(List::new(rows).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help =
            "↑/↓ select  Enter chart item  Esc portfolio  / filter  r reload  c check all  p check  x delete  a activity  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn truncate_cell(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[derive(Debug, Clone, Copy)]
struct AxisInsets {
    left: u16,
    right: u16,
    top: u16,
    bottom: u16,
}

fn chart_layout(inner: Rect) -> (Rect, Option<AxisInsets>) {
    let insets = AxisInsets {
        left: 8,
        right: 1,
        top: 0,
        bottom: 1,
    };

    if inner.width <= insets.left + insets.right + 10
        || inner.height <= insets.top + insets.bottom + 4
    {
        return (inner, None);
    }

    let rect = Rect {
        x: inner.x + insets.left,
        y: inner.y + insets.top,
        width: inner.width - insets.left - insets.right,
        height: inner.height - insets.top - insets.bottom,
    };

    (rect, Some(insets))
}

/// Draw the projector's gridline labels down the left inset, each aligned
/// with its gridline's row inside the chart area.
fn draw_gridline_labels(
    frame: &mut ratatui::Frame<'_>,
    inner: Rect,
    chart: Rect,
    insets: AxisInsets,
    geometry: &ChartGeometry,
) {
    let style = Style::default().fg(Color::Gray);
    let m = geometry.margins;
    let plot_height = geometry.height - m.top - m.bottom;
    if plot_height <= 0.0 || chart.height == 0 {
        return;
    }

    for gl in &geometry.gridlines {
        let u = ((gl.y - m.top) / plot_height).clamp(0.0, 1.0);
        let row = chart.y + ((chart.height - 1) as f64 * u).round() as u16;
        let label_len = gl.label.chars().count() as u16;
        let end = inner.x + insets.left.saturating_sub(1);
        let start = end.saturating_sub(label_len);
        if start < inner.x {
            continue;
        }
        frame.render_widget(
            Paragraph::new(gl.label.clone()).style(style),
            Rect {
                x: start,
                y: row,
                width: label_len,
                height: 1,
            },
        );
    }

    // Index-spaced axis: observations render evenly regardless of elapsed
    // time between them.
    let caption = Paragraph::new("price checks (evenly spaced)")
        .alignment(Alignment::Center)
        .style(style);
    let caption_rect = Rect {
        x: chart.x,
        y: chart.y + chart.height,
        width: chart.width,
        height: 1,
    };
    if caption_rect.y < inner.y + inner.height {
        frame.render_widget(caption, caption_rect);
    }
}
