//! # Company News
//!
//! A news digest pipeline for a fixed set of tracked companies (Google,
//! NVIDIA, Tesla, Tencent, Kweichow Moutai): fetch financial news via an
//! external web-search API, score each article with keyword heuristics
//! (impact and value, 1–10), summarize article bodies, and render the result
//! as a static HTML page.
//!
//! ## Usage
//!
//! ```sh
//! company_news fetch --config config.yaml
//! company_news render -o index.html
//! company_news run --config config.yaml
//! ```
//!
//! ## Architecture
//!
//! Strictly linear per invocation:
//! 1. **Fetch**: run each company's prioritized queries against the search
//!    API (sequential, fixed delay between calls), filter by the
//!    authority-domain whitelist, fetch article bodies
//! 2. **Score**: summarize each body and compute impact/value ratings
//! 3. **Persist**: write the dated JSON snapshot
//! 4. **Render**: read a snapshot and write the HTML card page

use chrono::Local;
use clap::Parser;
use std::error::Error;
use tracing::info;
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod analysis;
mod cli;
mod companies;
mod models;
mod outputs;
mod pipeline;
mod scoring;
mod search;
mod summary;
mod utils;

use cli::{Cli, Command, FetchArgs, RenderArgs, RunArgs};
use models::NewsSnapshot;
use outputs::{html, json};
use search::{SearchClient, SearchConfig};
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();

    match args.command {
        Command::Fetch(fetch_args) => {
            fetch(&fetch_args).await?;
        }
        Command::Render(render_args) => {
            render(&render_args).await?;
        }
        Command::Run(run_args) => {
            run(&run_args).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(secs = elapsed.as_secs(), millis = elapsed.subsec_millis(), "Execution complete");
    Ok(())
}

async fn fetch(args: &FetchArgs) -> Result<NewsSnapshot, Box<dyn Error>> {
    info!("Starting news fetch");
    ensure_writable_dir(&args.data_dir).await?;

    let config = SearchConfig::load(args.config.as_deref())?;
    let client = SearchClient::new(config);

    let snapshot = pipeline::run_fetch(&client).await;
    let path = json::write_snapshot(&snapshot, &args.data_dir).await?;
    info!(
        path = %path,
        total_searched = snapshot.total_searched,
        selected = snapshot.selected,
        "Snapshot written"
    );

    for (rank, item) in snapshot.news.iter().take(5).enumerate() {
        info!(
            rank = rank + 1,
            company = %item.company,
            value_score = item.value_score,
            impact_score = item.impact_score,
            title = %utils::truncate_for_log(&item.title, 80),
            "Top story"
        );
    }

    Ok(snapshot)
}

async fn render(args: &RenderArgs) -> Result<(), Box<dyn Error>> {
    let snapshot = json::read_snapshot(&args.data_dir, args.date).await?;
    info!(
        date = %args.date.unwrap_or_else(|| Local::now().date_naive()),
        items = snapshot.news.len(),
        "Rendering snapshot"
    );
    html::write_page(&snapshot, &args.output).await?;
    Ok(())
}

async fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let snapshot = fetch(&FetchArgs {
        data_dir: args.data_dir.clone(),
        config: args.config.clone(),
    })
    .await?;
    html::write_page(&snapshot, &args.output).await?;
    Ok(())
}
