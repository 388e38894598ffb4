//! Data models for fetched news items and on-disk snapshots.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`NewsItem`]: A scored news article attached to a tracked company
//! - [`StockImpact`]: The impact classification rendered with each item
//! - [`NewsSnapshot`]: The dated collection of items written between runs
//!
//! The JSON field names use camelCase to stay compatible with the snapshot
//! files the renderer consumes, hence `#[serde(rename_all = "camelCase")]`.

use serde::{Deserialize, Serialize};

/// A single scored news article for one tracked company.
///
/// Created by the fetch step from a search-API result, then enriched with
/// the summarizer output and both heuristic scores. Items only live inside
/// a [`NewsSnapshot`]; the next run overwrites them.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Stable per-run identifier (`{ticker}-{millis}-{seq}`).
    pub id: String,
    /// Article headline as returned by the search API.
    pub title: String,
    /// The search-result snippet.
    pub summary: String,
    /// Key-sentence summary extracted from the fetched article body.
    pub deep_summary: String,
    /// Link to the original article.
    pub url: String,
    /// Publishing site name.
    pub source: String,
    /// Publish timestamp as reported by the search API (RFC 3339 when lucky).
    pub publish_time: String,
    /// Ticker of the tracked company this item was fetched for.
    pub company: String,
    /// Informational-richness rating, 1–10.
    pub value_score: f64,
    /// Expected stock-price effect rating, 1–10.
    pub impact_score: u8,
    /// Impact classification shown on the rendered card.
    pub stock_impact: StockImpact,
    /// Numeric facts (e.g. `"12%"`) pulled out of the headline.
    pub key_data: Vec<String>,
    /// Signal keywords that matched the headline.
    pub important_info: Vec<String>,
    /// One-line reading frame for the card ("event → progress → meaning").
    pub logic_chain: String,
}

/// Classification of a news item's expected effect on the stock price.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockImpact {
    /// The impact score this classification was derived from.
    pub score: u8,
    /// Expected horizon of the effect.
    pub horizon: ImpactHorizon,
    /// Band name, e.g. "High".
    pub level: String,
    /// Human-readable explanation of the band.
    pub description: String,
}

/// Time horizon over which a news item is expected to move the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImpactHorizon {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl ImpactHorizon {
    pub fn label(&self) -> &'static str {
        match self {
            ImpactHorizon::ShortTerm => "short-term",
            ImpactHorizon::MediumTerm => "medium-term",
            ImpactHorizon::LongTerm => "long-term",
        }
    }
}

/// One run's worth of scored news, persisted as a dated flat JSON file.
///
/// Shape on disk: `{ date, totalSearched, selected, companies, news }`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsSnapshot {
    /// RFC 3339 timestamp of the run that produced this snapshot.
    pub date: String,
    /// Results kept after source filtering, summed across all queries.
    pub total_searched: usize,
    /// Number of items that survived selection.
    pub selected: usize,
    /// Tickers of the companies covered by this run.
    pub companies: Vec<String>,
    /// The selected items, best value score first.
    pub news: Vec<NewsItem>,
}

impl NewsItem {
    /// Bare domain of the article URL, without a `www.` prefix.
    /// For example `https://www.caixin.com/x` -> `caixin.com`.
    pub fn domain(&self) -> Option<String> {
        crate::utils::domain_of(&self.url)
    }
}
