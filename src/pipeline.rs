//! Fetch orchestration: queries, filtering, scoring, and final selection.
//!
//! One fetch run walks every tracked company's three query tiers in order,
//! waits a fixed delay between search calls, filters results against the
//! authority whitelist, fetches and summarizes article bodies, scores each
//! item, and assembles the final snapshot:
//!
//! - per company: best 1–3 items by value score;
//! - globally: URL-deduped, within the last 7 days (relaxed to 15 days for
//!   any company that would otherwise go uncovered), best value score first,
//!   capped at 10.

use crate::companies::{
    self, is_authority_source, CompanyConfig, COMPANIES, FINAL_NEWS_COUNT, MAX_ITEMS_PER_COMPANY,
    MAX_ITEMS_PER_QUERY,
};
use crate::models::{NewsItem, NewsSnapshot};
use crate::scoring;
use crate::search::{NewsSource, WebItem};
use crate::summary;
use crate::utils::contains_keyword;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::cmp::Ordering;
use tracing::{debug, info, instrument, warn};

/// Signal keywords surfaced on the card when they appear in the headline.
static HEADLINE_SIGNALS: &[&str] = &[
    "发布", "合作", "订单", "增长", "突破", "launch", "partnership", "order", "growth",
    "breakthrough",
];

/// Run the full fetch pipeline and return the snapshot to persist.
#[instrument(level = "info", skip_all)]
pub async fn run_fetch<S: NewsSource>(client: &S) -> NewsSnapshot {
    let mut all_news: Vec<NewsItem> = Vec::new();
    let mut total_searched = 0usize;
    let mut next_seq = 0usize;

    for company in COMPANIES.iter() {
        info!(company = company.key, ticker = company.ticker, "Searching company news");
        let mut company_news: Vec<NewsItem> = Vec::new();

        for spec in &company.queries {
            let results = client
                .search_with_backoff(spec.query, spec.time_range, MAX_ITEMS_PER_QUERY)
                .await;

            let filtered = filter_by_authority(results, MAX_ITEMS_PER_QUERY);
            total_searched += filtered.len();
            debug!(
                company = company.key,
                priority = spec.priority,
                kept = filtered.len(),
                "Filtered query results"
            );

            let analyzed: Vec<NewsItem> = stream::iter(filtered.into_iter().enumerate())
                .then(|(offset, item)| {
                    let seq = next_seq + offset;
                    async move {
                        let url = item.url.clone().unwrap_or_default();
                        let body = client.fetch_page_body(&url).await;
                        analyze_item(&item, company, spec.priority, &body, seq)
                    }
                })
                .collect()
                .await;
            next_seq += analyzed.len();
            company_news.extend(analyzed);

            // Fixed pause between search calls to stay under rate limits.
            tokio::time::sleep(client.request_delay()).await;
        }

        sort_by_value(&mut company_news);
        company_news.truncate(MAX_ITEMS_PER_COMPANY);
        info!(
            company = company.key,
            kept = company_news.len(),
            "Selected company items"
        );
        all_news.extend(company_news);
    }

    let news = select_final(all_news, Utc::now());
    let selected = news.len();
    info!(total_searched, selected, "Fetch pipeline complete");

    NewsSnapshot {
        date: Utc::now().to_rfc3339(),
        total_searched,
        selected,
        companies: COMPANIES.iter().map(|c| c.ticker.to_string()).collect(),
        news,
    }
}

/// Keep authority-domain results, topping up with other domains so a query
/// still yields up to `min_count` items when authoritative coverage is thin.
pub fn filter_by_authority(items: Vec<WebItem>, min_count: usize) -> Vec<WebItem> {
    let (mut authoritative, other): (Vec<WebItem>, Vec<WebItem>) = items
        .into_iter()
        .filter(|item| item.url.is_some())
        .partition(|item| is_authority_source(item.url.as_deref().unwrap_or_default()));

    if authoritative.len() < min_count {
        let missing = min_count - authoritative.len();
        authoritative.extend(other.into_iter().take(missing));
    }
    authoritative
}

/// Turn one search result into a scored [`NewsItem`]. `seq` is the item's
/// position in the run, making ids unique even within one millisecond.
pub fn analyze_item(
    item: &WebItem,
    company: &CompanyConfig,
    priority: u8,
    body: &str,
    seq: usize,
) -> NewsItem {
    let title = item.title.clone().unwrap_or_else(|| "Untitled".to_string());
    let snippet = item.snippet.clone().unwrap_or_else(|| "No snippet".to_string());
    let source = item
        .site_name
        .clone()
        .unwrap_or_else(|| "Unknown source".to_string());
    let publish_time = item
        .publish_time
        .clone()
        .unwrap_or_else(|| Utc::now().to_rfc3339());
    let url = item.url.clone().unwrap_or_default();

    let deep_summary = summary::summarize(&title, body);
    let value_score = scoring::value_score(&snippet, companies::priority_weight(priority));
    let stock_impact = scoring::stock_impact(&title, &snippet);
    let impact_score = stock_impact.score;

    NewsItem {
        id: format!(
            "{}-{}-{}",
            company.ticker,
            Utc::now().timestamp_millis(),
            seq
        ),
        key_data: headline_numbers(&title),
        important_info: headline_signals(&title),
        logic_chain: logic_chain(&title).to_string(),
        title,
        summary: snippet,
        deep_summary,
        url,
        source,
        publish_time,
        company: company.ticker.to_string(),
        value_score,
        impact_score,
        stock_impact,
    }
}

/// Global selection: URL dedupe, recency window, value ordering, cap.
pub fn select_final(all_news: Vec<NewsItem>, now: DateTime<Utc>) -> Vec<NewsItem> {
    let mut ranked: Vec<NewsItem> = all_news
        .into_iter()
        .unique_by(|item| item.url.clone())
        .collect();
    sort_by_value(&mut ranked);

    let seven_days_ago = now - Duration::days(7);
    let fifteen_days_ago = now - Duration::days(15);

    let mut selected: Vec<NewsItem> = Vec::new();
    for item in &ranked {
        match parse_publish_time(&item.publish_time) {
            Some(published) if published >= seven_days_ago => selected.push(item.clone()),
            Some(_) => {}
            None => warn!(url = %item.url, time = %item.publish_time, "Unparseable publish time; dropped from recency window"),
        }
    }

    // Any company left uncovered gets one older item, up to 15 days back.
    for company in COMPANIES.iter() {
        let covered = selected.iter().any(|item| item.company == company.ticker);
        if covered {
            continue;
        }
        let fallback = ranked.iter().find(|item| {
            item.company == company.ticker
                && parse_publish_time(&item.publish_time)
                    .map(|published| published >= fifteen_days_ago)
                    .unwrap_or(false)
        });
        if let Some(item) = fallback {
            selected.push(item.clone());
        }
    }

    sort_by_value(&mut selected);
    selected.truncate(FINAL_NEWS_COUNT);
    selected
}

/// Parse the publish timestamps the search API hands back. RFC 3339 first,
/// then the bare datetime and date shapes some sites use.
pub fn parse_publish_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(parsed.and_utc());
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(parsed.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

fn sort_by_value(items: &mut [NewsItem]) {
    items.sort_by(|a, b| {
        b.value_score
            .partial_cmp(&a.value_score)
            .unwrap_or(Ordering::Equal)
    });
}

fn headline_numbers(title: &str) -> Vec<String> {
    use once_cell::sync::Lazy;
    use regex::Regex;
    static PERCENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?%").unwrap());
    PERCENT_RE
        .find_iter(title)
        .map(|m| m.as_str().to_string())
        .take(3)
        .collect()
}

fn headline_signals(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    HEADLINE_SIGNALS
        .iter()
        .filter(|signal| contains_keyword(&lowered, signal))
        .map(|signal| signal.to_string())
        .collect()
}

fn logic_chain(title: &str) -> &'static str {
    let lowered = title.to_lowercase();
    if contains_keyword(&lowered, "财报") || contains_keyword(&lowered, "earnings") {
        "data release → market reaction → positioning"
    } else if contains_keyword(&lowered, "产品") || contains_keyword(&lowered, "product") {
        "product launch → capabilities → market effect"
    } else {
        "event → progress → meaning"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn web_item(title: &str, url: &str, snippet: &str, publish_time: &str) -> WebItem {
        WebItem {
            title: Some(title.to_string()),
            url: Some(url.to_string()),
            site_name: Some("Test Wire".to_string()),
            publish_time: Some(publish_time.to_string()),
            snippet: Some(snippet.to_string()),
        }
    }

    fn google() -> &'static CompanyConfig {
        &COMPANIES[0]
    }

    #[test]
    fn authority_filter_prefers_whitelisted_domains() {
        let items = vec![
            web_item("a", "https://blog.example.com/a", "", "2026-08-26"),
            web_item("b", "https://www.reuters.com/b", "", "2026-08-26"),
            web_item("c", "https://www.caixin.com/c", "", "2026-08-26"),
            web_item("d", "https://www.bloomberg.com/d", "", "2026-08-26"),
            web_item("e", "https://other.example.com/e", "", "2026-08-26"),
        ];
        let filtered = filter_by_authority(items, 3);
        assert_eq!(filtered.len(), 3);
        assert!(filtered
            .iter()
            .all(|item| is_authority_source(item.url.as_deref().unwrap())));
    }

    #[test]
    fn authority_filter_tops_up_when_thin() {
        let items = vec![
            web_item("a", "https://blog.example.com/a", "", "2026-08-26"),
            web_item("b", "https://www.reuters.com/b", "", "2026-08-26"),
            web_item("c", "https://other.example.com/c", "", "2026-08-26"),
        ];
        let filtered = filter_by_authority(items, 3);
        assert_eq!(filtered.len(), 3);
        // Authority item first, others appended in order.
        assert_eq!(filtered[0].url.as_deref(), Some("https://www.reuters.com/b"));
    }

    #[test]
    fn authority_filter_drops_urlless_items() {
        let items = vec![WebItem::default()];
        assert!(filter_by_authority(items, 3).is_empty());
    }

    #[test]
    fn analyze_item_fills_fallbacks_and_scores() {
        let item = WebItem::default();
        let news = analyze_item(&item, google(), 1, "", 0);
        assert_eq!(news.title, "Untitled");
        assert_eq!(news.summary, "No snippet");
        assert_eq!(news.source, "Unknown source");
        assert_eq!(news.company, "GOOGL");
        assert!((1.0..=10.0).contains(&news.value_score));
        assert!((1..=10).contains(&news.impact_score));
        assert!(news.deep_summary.starts_with("Untitled"));
    }

    #[test]
    fn analyze_item_extracts_headline_facts() {
        let item = web_item(
            "Google 财报发布：营收增长 25.5%",
            "https://www.reuters.com/google",
            "Alphabet 财报显示营收增长",
            "2026-08-26T00:00:00Z",
        );
        let news = analyze_item(&item, google(), 1, "", 0);
        assert_eq!(news.key_data, vec!["25.5%".to_string()]);
        assert!(news.important_info.contains(&"发布".to_string()));
        assert!(news.important_info.contains(&"增长".to_string()));
        assert_eq!(news.logic_chain, "data release → market reaction → positioning");
    }

    fn news(company: &str, url: &str, value: f64, publish_time: &str) -> NewsItem {
        let item = web_item("t", url, "s", publish_time);
        let mut news = analyze_item(&item, google(), 3, "", 0);
        news.company = company.to_string();
        news.value_score = value;
        news
    }

    #[test]
    fn item_ids_are_unique_within_a_millisecond() {
        let item = web_item("t", "https://www.reuters.com/x", "s", "2026-08-26");
        let a = analyze_item(&item, google(), 1, "", 0);
        let b = analyze_item(&item, google(), 1, "", 1);
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("GOOGL-"));
        assert!(a.id.ends_with("-0"));
        assert!(b.id.ends_with("-1"));
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 27, 12, 0, 0).unwrap()
    }

    #[test]
    fn select_final_dedupes_and_sorts() {
        let items = vec![
            news("GOOGL", "https://a.example/1", 6.0, "2026-08-26T00:00:00Z"),
            news("GOOGL", "https://a.example/1", 9.0, "2026-08-26T00:00:00Z"),
            news("NVDA", "https://a.example/2", 8.0, "2026-08-26T00:00:00Z"),
        ];
        let selected = select_final(items, fixed_now());
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].company, "NVDA");
    }

    #[test]
    fn select_final_drops_stale_items() {
        let items = vec![
            news("GOOGL", "https://a.example/1", 9.0, "2026-06-01T00:00:00Z"),
            news("NVDA", "https://a.example/2", 5.0, "2026-08-25T00:00:00Z"),
        ];
        let selected = select_final(items, fixed_now());
        // GOOGL's only item is months old: outside even the relaxed window.
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].company, "NVDA");
    }

    #[test]
    fn select_final_relaxes_window_for_uncovered_companies() {
        let items = vec![
            news("GOOGL", "https://a.example/1", 9.0, "2026-08-15T00:00:00Z"),
            news("NVDA", "https://a.example/2", 5.0, "2026-08-25T00:00:00Z"),
        ];
        let selected = select_final(items, fixed_now());
        // The GOOGL item is 12 days old: outside 7 days, inside 15.
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().any(|item| item.company == "GOOGL"));
    }

    #[test]
    fn select_final_caps_at_ten() {
        let items: Vec<NewsItem> = (0..25)
            .map(|i| {
                news(
                    "GOOGL",
                    &format!("https://a.example/{i}"),
                    5.0,
                    "2026-08-26T00:00:00Z",
                )
            })
            .collect();
        assert_eq!(select_final(items, fixed_now()).len(), FINAL_NEWS_COUNT);
    }

    struct CannedSource {
        calls: std::sync::Mutex<usize>,
    }

    impl NewsSource for CannedSource {
        fn request_delay(&self) -> std::time::Duration {
            std::time::Duration::ZERO
        }

        async fn search_with_backoff(
            &self,
            _query: &str,
            _time_range: crate::search::TimeRange,
            _count: usize,
        ) -> Vec<WebItem> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            vec![
                web_item(
                    "财报发布",
                    &format!("https://www.reuters.com/story-{}", *calls),
                    "营收增长 25%",
                    &Utc::now().to_rfc3339(),
                ),
                // No URL: dropped by the authority filter, not counted.
                WebItem::default(),
            ]
        }

        async fn fetch_page_body(&self, _url: &str) -> String {
            String::new()
        }
    }

    #[tokio::test]
    async fn run_fetch_counts_kept_items_and_assigns_unique_ids() {
        let source = CannedSource {
            calls: std::sync::Mutex::new(0),
        };
        let snapshot = run_fetch(&source).await;

        // 5 companies x 3 queries, one item kept per query.
        assert_eq!(snapshot.total_searched, 15);
        assert_eq!(snapshot.news.len(), FINAL_NEWS_COUNT);
        assert_eq!(snapshot.companies.len(), 5);

        let ids: std::collections::HashSet<&str> =
            snapshot.news.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids.len(), snapshot.news.len());
    }

    #[test]
    fn publish_time_parsing_shapes() {
        assert!(parse_publish_time("2026-08-26T09:00:00Z").is_some());
        assert!(parse_publish_time("2026-08-26T09:00:00+08:00").is_some());
        assert!(parse_publish_time("2026-08-26 09:00:00").is_some());
        assert!(parse_publish_time("2026-08-26").is_some());
        assert!(parse_publish_time("yesterday").is_none());
        assert!(parse_publish_time("").is_none());
    }
}
