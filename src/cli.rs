//! Command-line interface definitions.
//!
//! Three subcommands mirror the pipeline stages: `fetch` writes the dated
//! JSON snapshot, `render` turns a snapshot into the static HTML page, and
//! `run` does both in one invocation.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Fetch, score, and render financial news for the tracked companies.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch and score today's news, writing a JSON snapshot
    Fetch(FetchArgs),
    /// Render a JSON snapshot into the static HTML page
    Render(RenderArgs),
    /// Fetch then render in one go
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Directory for JSON snapshots
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Path to the search config.yaml (falls back to SEARCH_API_* env vars)
    #[arg(short, long, env = "SEARCH_CONFIG")]
    pub config: Option<String>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Directory holding JSON snapshots
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Output HTML file
    #[arg(short, long, default_value = "index.html")]
    pub output: String,

    /// Snapshot date to render (YYYY-MM-DD); today when omitted
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory for JSON snapshots
    #[arg(short, long, default_value = "data")]
    pub data_dir: String,

    /// Path to the search config.yaml (falls back to SEARCH_API_* env vars)
    #[arg(short, long, env = "SEARCH_CONFIG")]
    pub config: Option<String>,

    /// Output HTML file
    #[arg(short, long, default_value = "index.html")]
    pub output: String,
}
