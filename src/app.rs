//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main"
//! that:
//! - parses CLI arguments
//! - builds the API client
//! - dispatches to the printing commands or the TUI
//! - issues mutations and reports their outcomes

use chrono::NaiveDateTime;
use clap::Parser;

use crate::api::ApiClient;
use crate::chart::{self, Margins};
use crate::cli::{
    ActivityArgs, AddArgs, ChartArgs, CheckArgs, Command, EditArgs, ListArgs, PriceArgs, RmArgs,
    RmPriceArgs,
};
use crate::domain::Item;
use crate::error::AppError;
use crate::io::{export, svg};
use crate::{portfolio, report};

pub mod pipeline;

/// Entry point for the `curio` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `curio` (and `curio --api-url ...`) to behave like
    // `curio tui`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite
    // of the argv list before parsing. This preserves a clean clap
    // structure while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    let client = ApiClient::from_env(cli.api_url.as_deref())?;

    match cli.command {
        Command::Tui => crate::tui::run(client),
        Command::List(args) => handle_list(&client, args),
        Command::Activity(args) => handle_activity(&client, args),
        Command::Chart(args) => handle_chart(&client, args),
        Command::Add(args) => handle_add(&client, args),
        Command::Edit(args) => handle_edit(&client, args),
        Command::Rm(args) => handle_rm(&client, args),
        Command::Price(args) => handle_price(&client, args),
        Command::RmPrice(args) => handle_rm_price(&client, args),
        Command::Check(args) => handle_check(&client, args),
    }
}

fn handle_list(client: &ApiClient, args: ListArgs) -> Result<(), AppError> {
    let (snapshot, model) = pipeline::load_dashboard(client)?;
    print!("{}", report::format_summary(&model.summary));
    println!();

    let filtered = portfolio::filter_items(&snapshot.items, &args.search);
    if filtered.is_empty() {
        if args.search.is_empty() {
            println!("No items tracked yet.");
        } else {
            println!("No items found matching \"{}\".", args.search);
        }
        return Ok(());
    }
    print!("{}", report::format_items_table(&filtered));
    Ok(())
}

fn handle_activity(client: &ApiClient, args: ActivityArgs) -> Result<(), AppError> {
    let (_, model) = pipeline::load_dashboard(client)?;
    print!("{}", report::format_activity(&model.activity));

    if let Some(path) = &args.export {
        export::write_activity_csv(path, &model.activity)?;
        println!(
            "\nWrote {} events to {}",
            model.activity.len(),
            path.display()
        );
    }
    Ok(())
}

fn handle_chart(client: &ApiClient, args: ChartArgs) -> Result<(), AppError> {
    let (snapshot, model) = pipeline::load_dashboard(client)?;

    let (series, title) = match args.item {
        Some(id) => {
            let item = find_item(&snapshot.items, id)?;
            (item.sorted_history(), item.name.clone())
        }
        None => (model.aggregate.clone(), "Portfolio value".to_string()),
    };

    match chart::project(&series, args.width, args.height, Margins::DASHBOARD) {
        None => {
            println!("No price history to chart.");
            Ok(())
        }
        Some(geometry) => {
            svg::write_chart_svg(&args.out, &geometry, &title)?;
            println!(
                "Wrote \"{title}\" ({} points) to {}",
                geometry.line.len(),
                args.out.display()
            );
            Ok(())
        }
    }
}

fn handle_add(client: &ApiClient, args: AddArgs) -> Result<(), AppError> {
    let id = client.create_item(
        &args.name,
        args.category.as_deref(),
        args.price,
        args.exclude.as_deref(),
    )?;
    println!("Tracking new item #{id}: {}", args.name);
    Ok(())
}

fn handle_edit(client: &ApiClient, args: EditArgs) -> Result<(), AppError> {
    let snapshot = client.fetch_items()?;
    let mut item = find_item(&snapshot.items, args.id)?.clone();

    if let Some(name) = args.name {
        item.name = name;
    }
    if let Some(category) = args.category {
        item.category = Some(category);
    }
    if let Some(price) = args.price {
        item.price = price;
    }
    if let Some(exclude) = args.exclude {
        item.exclude_keywords = Some(exclude);
    }

    client.update_item(&item)?;
    println!("Updated item #{}: {}", item.id, item.name);
    Ok(())
}

fn handle_rm(client: &ApiClient, args: RmArgs) -> Result<(), AppError> {
    let snapshot = client.fetch_items()?;
    let item = find_item(&snapshot.items, args.id)?;
    let name = item.name.clone();
    client.delete_item(args.id)?;
    println!("Stopped tracking item #{}: {name}", args.id);
    Ok(())
}

fn handle_price(client: &ApiClient, args: PriceArgs) -> Result<(), AppError> {
    if !(args.value.is_finite() && args.value >= 0.0) {
        return Err(AppError::new(2, "Price must be a non-negative number."));
    }
    // The server stores whatever date it is given; always send one so a
    // missing flag means "now" rather than a null timestamp.
    let at = match args.date.as_deref() {
        Some(raw) => parse_cli_date(raw)?.start(),
        None => chrono::Local::now().naive_local(),
    };
    client.add_price(args.id, args.value, Some(at))?;
    println!(
        "Recorded {} for item #{}.",
        report::format_currency(args.value),
        args.id
    );
    Ok(())
}

fn handle_rm_price(client: &ApiClient, args: RmPriceArgs) -> Result<(), AppError> {
    let snapshot = client.fetch_items()?;
    let mut item = find_item(&snapshot.items, args.id)?.clone();
    let spec = parse_cli_date(&args.date)?;

    // When duplicates match, the newest observation wins; positional
    // deletion against a re-sorted list is ambiguous and not supported.
    let target = item
        .history
        .iter()
        .enumerate()
        .filter(|(_, o)| spec.matches(o.at) && (o.price - args.value).abs() < 1e-6)
        .max_by_key(|(_, o)| o.at)
        .map(|(idx, _)| idx);

    let Some(idx) = target else {
        return Err(AppError::new(
            2,
            format!(
                "No observation on {} at {} for item #{}.",
                args.date,
                report::format_currency(args.value),
                args.id
            ),
        ));
    };

    let removed = item.history.remove(idx);
    client.update_item(&item)?;
    println!(
        "Deleted observation {} / {} from item #{}.",
        report::format_datetime(removed.at),
        report::format_currency(removed.price),
        args.id
    );
    Ok(())
}

fn handle_check(client: &ApiClient, args: CheckArgs) -> Result<(), AppError> {
    match args.id {
        Some(id) => {
            let outcome = client.check_item(id)?;
            if !outcome.success {
                return Err(AppError::new(
                    4,
                    format!("Price check failed: {}", outcome.status),
                ));
            }
            match outcome.price {
                Some(price) => println!(
                    "Price check complete: {} for item #{id}.",
                    report::format_currency(price)
                ),
                None => println!("Price check complete for item #{id} (no price returned)."),
            }
        }
        None => {
            let results = client.check_all()?;
            for line in &results {
                println!("{line}");
            }
            println!("Checked {} items.", results.len());
        }
    }
    Ok(())
}

fn find_item(items: &[Item], id: u64) -> Result<&Item, AppError> {
    items
        .iter()
        .find(|i| i.id == id)
        .ok_or_else(|| AppError::new(2, format!("No item with id {id}.")))
}

/// A user-supplied date: a whole day, or an exact timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DateSpec {
    Day(chrono::NaiveDate),
    Exact(NaiveDateTime),
}

impl DateSpec {
    fn start(self) -> NaiveDateTime {
        match self {
            DateSpec::Day(d) => d.and_time(chrono::NaiveTime::MIN),
            DateSpec::Exact(dt) => dt,
        }
    }

    fn matches(self, at: NaiveDateTime) -> bool {
        match self {
            DateSpec::Day(d) => at.date() == d,
            DateSpec::Exact(dt) => at == dt,
        }
    }
}

fn parse_cli_date(raw: &str) -> Result<DateSpec, AppError> {
    let trimmed = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S") {
        return Ok(DateSpec::Exact(dt));
    }
    if let Ok(d) = chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(DateSpec::Day(d));
    }
    Err(AppError::new(
        2,
        format!("Invalid date '{trimmed}' (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)."),
    ))
}

/// Rewrite argv so `curio` defaults to `curio tui`.
///
/// Rules:
/// - `curio`                     -> `curio tui`
/// - `curio --api-url X`         -> `curio tui --api-url X`
/// - `curio --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(
        arg1.as_str(),
        "tui" | "list" | "activity" | "chart" | "add" | "edit" | "rm" | "price" | "rm-price"
            | "check"
    );
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["curio"])), argv(&["curio", "tui"]));
    }

    #[test]
    fn leading_flags_go_to_tui() {
        assert_eq!(
            rewrite_args(argv(&["curio", "--api-url", "http://x"])),
            argv(&["curio", "tui", "--api-url", "http://x"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["curio", "list"])),
            argv(&["curio", "list"])
        );
        assert_eq!(
            rewrite_args(argv(&["curio", "--help"])),
            argv(&["curio", "--help"])
        );
    }

    #[test]
    fn cli_dates_parse_as_day_or_exact() {
        let day = parse_cli_date("2025-03-14").unwrap();
        assert!(matches!(day, DateSpec::Day(_)));
        assert!(day.matches(day.start()));
        assert!(day.matches(
            chrono::NaiveDate::from_ymd_opt(2025, 3, 14)
                .unwrap()
                .and_hms_opt(18, 30, 0)
                .unwrap()
        ));

        let exact = parse_cli_date("2025-03-14T18:30:00").unwrap();
        assert!(matches!(exact, DateSpec::Exact(_)));
        assert!(!exact.matches(day.start()));

        assert!(parse_cli_date("14/03/2025").is_err());
    }
}
