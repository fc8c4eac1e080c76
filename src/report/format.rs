//! Terminal tables and value formatting for the CLI views.
//!
//! We keep formatting code in one place so:
//! - the chart/portfolio code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use chrono::NaiveDateTime;

use crate::chart;
use crate::domain::Item;
use crate::portfolio::{self, ActivityEvent, Summary, Trend};

/// Format a price as GBP with thousands grouping, e.g. `£1,234.56`.
pub fn format_currency(value: f64) -> String {
    let negative = value < 0.0;
    let pence = (value.abs() * 100.0).round() as u64;
    let whole = pence / 100;
    let cents = pence % 100;
    let sign = if negative { "-" } else { "" };
    format!("{sign}£{}.{cents:02}", group_thousands(whole))
}

/// Format a timestamp as a short date, e.g. `14 Mar 2025`.
pub fn format_date(at: NaiveDateTime) -> String {
    at.format("%-d %b %Y").to_string()
}

/// Format a timestamp with the time of day, e.g. `14 Mar 2025 09:26`.
pub fn format_datetime(at: NaiveDateTime) -> String {
    at.format("%-d %b %Y %H:%M").to_string()
}

/// Trend cell for tables and list rows: arrow plus absolute percentage.
/// `None` (fewer than two observations) renders as a dash.
pub fn format_trend(trend: Option<&Trend>) -> String {
    match trend {
        None => "-".to_string(),
        Some(t) => match t.pct_change {
            Some(pct) => format!("{} {:.1}%", t.direction.arrow(), pct.abs()),
            None => format!("{} n/a", t.direction.arrow()),
        },
    }
}

/// Render a sparkline path as a run of block glyphs for single-line rows.
pub fn sparkline_glyphs(path: &[(f64, f64)]) -> String {
    const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    path.iter()
        .map(|&(_, y)| {
            let level = 1.0 - (y / chart::SPARKLINE_HEIGHT).clamp(0.0, 1.0);
            BLOCKS[((level * 7.0).round() as usize).min(7)]
        })
        .collect()
}

/// Format the dashboard summary header.
pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str("=== curio — collectibles dashboard ===\n");
    out.push_str(&format!(
        "Portfolio value: {}\n",
        format_currency(summary.total_value)
    ));
    out.push_str(&format!("Items tracked: {}\n", summary.item_count));
    let last = match summary.last_check {
        Some(at) => format_datetime(at),
        None => "never".to_string(),
    };
    out.push_str(&format!("Last check: {last}\n"));
    out
}

/// Format the item table for `curio list`.
pub fn format_items_table(items: &[&Item]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>6} {:<24} {:<14} {:>12} {:>9} {:<10} {:<12}\n",
        "id", "name", "category", "price", "trend", "spark", "last check"
    ));
    out.push_str(&format!(
        "{:->6} {:-<24} {:-<14} {:->12} {:->9} {:-<10} {:-<12}\n",
        "", "", "", "", "", "", ""
    ));

    for item in items {
        let trend = portfolio::trend(&item.history);
        let spark = chart::sparkline(&item.history)
            .map(|path| sparkline_glyphs(&path))
            .unwrap_or_default();
        let last = item
            .latest_observation()
            .map(|o| format_date(o.at))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:>6} {:<24} {:<14} {:>12} {:>9} {:<10} {:<12}\n",
            item.id,
            truncate(&item.name, 24),
            truncate(item.category.as_deref().unwrap_or(""), 14),
            format_currency(item.price),
            format_trend(trend.as_ref()),
            spark,
            last,
        ));
    }

    out
}

/// Format the activity feed for `curio activity`.
pub fn format_activity(events: &[ActivityEvent]) -> String {
    if events.is_empty() {
        return "No activity recorded yet.\n".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:<18} {:<24} {:>12} {}\n",
        "date", "item", "price", "source"
    ));
    out.push_str(&format!(
        "{:-<18} {:-<24} {:->12} {:-<6}\n",
        "", "", "", ""
    ));
    for event in events {
        out.push_str(&format!(
            "{:<18} {:<24} {:>12} {}\n",
            format_datetime(event.at),
            truncate(&event.item_name, 24),
            format_currency(event.price),
            event.url.as_deref().unwrap_or("-"),
        ));
    }
    out
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
