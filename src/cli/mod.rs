//! Command-line parsing for the collectibles dashboard client.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the chart/portfolio code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "curio",
    version,
    about = "Collectibles price dashboard (terminal client)"
)]
pub struct Cli {
    /// Base URL of the tracking service (overrides CURIO_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    ///
    /// This uses the same snapshot pipeline as the printing commands, but
    /// renders the portfolio chart, item list, and activity feed in a
    /// terminal UI using Ratatui.
    Tui,
    /// Print the portfolio summary and item table.
    List(ListArgs),
    /// Print the activity feed of recorded price checks.
    Activity(ActivityArgs),
    /// Project a price chart and write it as a standalone SVG.
    Chart(ChartArgs),
    /// Track a new item.
    Add(AddArgs),
    /// Edit an item's settings.
    Edit(EditArgs),
    /// Stop tracking an item and discard its history.
    Rm(RmArgs),
    /// Record a price observation for an item.
    Price(PriceArgs),
    /// Delete a recorded price observation.
    RmPrice(RmPriceArgs),
    /// Trigger a server-side price check (one item, or all).
    Check(CheckArgs),
}

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Only show items whose name or category matches.
    #[arg(short = 's', long, default_value = "")]
    pub search: String,
}

#[derive(Debug, Parser)]
pub struct ActivityArgs {
    /// Also write the feed to a CSV file.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct ChartArgs {
    /// Chart a single item's history instead of the portfolio aggregate.
    #[arg(short = 'i', long)]
    pub item: Option<u64>,

    /// Viewport width in pixels.
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Viewport height in pixels.
    #[arg(long, default_value_t = 400.0)]
    pub height: f64,

    /// Output SVG path.
    #[arg(short = 'o', long, value_name = "SVG")]
    pub out: PathBuf,
}

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Item name.
    #[arg(long)]
    pub name: String,

    /// Category tag (e.g. "Diecast", "Tinplate").
    #[arg(long)]
    pub category: Option<String>,

    /// Acquisition price.
    #[arg(long, default_value_t = 0.0)]
    pub price: f64,

    /// Comma-separated keywords the price check should exclude.
    #[arg(long, value_name = "KEYWORDS")]
    pub exclude: Option<String>,
}

#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Item id.
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Update the acquisition price.
    #[arg(long)]
    pub price: Option<f64>,

    /// Replace the excluded keywords.
    #[arg(long, value_name = "KEYWORDS")]
    pub exclude: Option<String>,
}

#[derive(Debug, Parser)]
pub struct RmArgs {
    /// Item id.
    pub id: u64,
}

#[derive(Debug, Parser)]
pub struct PriceArgs {
    /// Item id.
    pub id: u64,

    /// Observed price.
    pub value: f64,

    /// Observation date (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS); defaults to
    /// now.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Parser)]
pub struct RmPriceArgs {
    /// Item id.
    pub id: u64,

    /// Date of the observation to delete (YYYY-MM-DD matches the whole
    /// day; YYYY-MM-DDTHH:MM:SS matches exactly).
    #[arg(long)]
    pub date: String,

    /// Price of the observation to delete.
    #[arg(long)]
    pub value: f64,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// Item id; omit to check every item.
    pub id: Option<u64>,
}
