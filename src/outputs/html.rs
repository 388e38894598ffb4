//! Static HTML page rendering.
//!
//! Maps a snapshot into one self-contained card page: a header with run
//! stats, one card per news item (company badge, impact badge, deep-analysis
//! block, rating-explanation block, star rating, link to the original), and
//! a disclaimer footer. Styling leans on the Tailwind CDN so the file needs
//! no build step; the page is written to a fixed path and served by whatever
//! static host the reader prefers.

use crate::analysis;
use crate::companies::COMPANIES;
use crate::models::{NewsItem, NewsSnapshot};
use crate::scoring::{band_for, scoring_basis, ScoreKind, IMPACT_BANDS, VALUE_BANDS};
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::Write as _;
use tokio::fs;
use tracing::{info, instrument};

/// Escape text for safe interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Five-star display of the combined (impact + value) / 2 score.
pub fn star_rating(impact_score: u8, value_score: f64) -> String {
    let combined = (f64::from(impact_score) + value_score) / 2.0;
    let filled = ((combined / 2.0).round() as usize).min(5);
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Convert the deep-analysis markdown into HTML: headings, bold runs, and
/// line breaks. Input is escaped first, so markup in article text stays
/// inert.
fn analysis_to_html(md: &str) -> String {
    static BOLD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());

    let mut html = String::new();
    for line in md.lines() {
        let line = escape_html(line);
        if let Some(heading) = line.strip_prefix("## ") {
            write!(html, "<h4 class=\"text-lg font-semibold mt-4 mb-2\">{heading}</h4>").unwrap();
        } else if let Some(heading) = line.strip_prefix("### ") {
            write!(html, "<h5 class=\"text-md font-medium mt-3 mb-1\">{heading}</h5>").unwrap();
        } else if line.is_empty() {
            html.push_str("<br>");
        } else {
            let line = BOLD_RE.replace_all(&line, "<strong>$1</strong>");
            write!(html, "<p>{line}</p>").unwrap();
        }
    }
    html
}

fn impact_badge_classes(score: u8) -> &'static str {
    if score >= 7 {
        "bg-red-100 text-red-800"
    } else if score >= 5 {
        "bg-yellow-100 text-yellow-800"
    } else {
        "bg-green-100 text-green-800"
    }
}

fn company_style(ticker: &str) -> (&'static str, &'static str) {
    COMPANIES
        .iter()
        .find(|company| company.ticker == ticker)
        .map(|company| (company.color, company.icon))
        .unwrap_or(("bg-gray-100 text-gray-800", "📰"))
}

/// Render one news card.
pub fn render_card(item: &NewsItem) -> String {
    let (color, icon) = company_style(&item.company);
    let impact_band = band_for(item.impact_score, IMPACT_BANDS);
    let value_band = band_for(item.value_score.round().clamp(1.0, 10.0) as u8, VALUE_BANDS);
    let source_line = match item.domain() {
        Some(domain) => format!("{} · {}", item.source, domain),
        None => item.source.clone(),
    };
    let impact_basis = scoring_basis(&item.title, &item.summary, ScoreKind::Impact).join(", ");
    let value_basis = scoring_basis(&item.title, &item.summary, ScoreKind::Value).join(", ");
    let analysis_html = analysis_to_html(&analysis::deep_analysis(item));

    let mut card = String::new();
    write!(
        card,
        r#"<div class="bg-white rounded-xl p-6 shadow-sm card-hover border border-gray-100 mb-6">
  <div class="flex items-start justify-between mb-6">
    <div class="flex items-center space-x-3">
      <span class="flex items-center justify-center w-10 h-10 rounded-full {color}"><span class="text-base">{icon}</span></span>
      <div>
        <span class="inline-block px-3 py-1 text-sm font-medium rounded-full {color}">{company}</span>
        <div class="mt-1 text-xs text-gray-500">{source}</div>
      </div>
    </div>
    <div class="text-right">
      <span class="inline-block px-3 py-1 text-xs font-medium rounded {impact_classes}">{impact_level} ({impact_score}/10)</span>
      <div class="mt-2 text-xs text-gray-600">{impact_description}</div>
    </div>
  </div>
  <h3 class="text-xl font-bold text-gray-900 mb-4">{title}</h3>
  <div class="mb-6 p-4 bg-gray-50 rounded-lg border border-gray-200"><div class="prose prose-sm max-w-none">{analysis}</div></div>
  <div class="mb-6 p-4 bg-blue-50 rounded-lg border border-blue-100">
    <h4 class="text-md font-semibold text-blue-800 mb-3">How this was rated</h4>
    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
      <div>
        <h5 class="text-sm font-medium text-gray-700 mb-1">Impact: {impact_score}/10 — {impact_level}</h5>
        <p class="text-xs text-gray-600">{impact_description}</p>
        <div class="mt-2 text-xs text-gray-500">Based on: {impact_basis}</div>
      </div>
      <div>
        <h5 class="text-sm font-medium text-gray-700 mb-1">Value: {value_score}/10 — {value_level}</h5>
        <p class="text-xs text-gray-600">{value_description}</p>
        <div class="mt-2 text-xs text-gray-500">Based on: {value_basis}</div>
      </div>
    </div>
  </div>
  <div class="flex items-center justify-between pt-4 border-t border-gray-200">
    <div class="text-sm text-gray-600"><span class="font-medium">Overall:</span> <span class="ml-2">{stars}</span></div>
    <a href="{url}" target="_blank" rel="noopener noreferrer" class="inline-flex items-center px-4 py-2 text-sm font-medium text-white bg-blue-600 rounded-lg hover:bg-blue-700 transition-colors">Read original</a>
  </div>
</div>"#,
        color = color,
        icon = icon,
        company = escape_html(&item.company),
        source = escape_html(&source_line),
        impact_classes = impact_badge_classes(item.impact_score),
        impact_level = impact_band.level,
        impact_score = item.impact_score,
        impact_description = impact_band.description,
        title = escape_html(&item.title),
        analysis = analysis_html,
        impact_basis = impact_basis,
        value_score = item.value_score,
        value_level = value_band.level,
        value_description = value_band.description,
        value_basis = value_basis,
        stars = star_rating(item.impact_score, item.value_score),
        url = escape_html(&item.url),
    )
    .unwrap();
    card
}

/// Render the full page for a snapshot.
pub fn render_page(snapshot: &NewsSnapshot) -> String {
    let run_date = DateTime::parse_from_rfc3339(&snapshot.date)
        .map(|parsed| parsed.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|_| snapshot.date.clone());

    let mut page = String::new();
    write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Tracked Company News</title>
  <script src="https://cdn.tailwindcss.com"></script>
  <style>
    .card-hover {{ transition: all 0.3s ease; }}
    .card-hover:hover {{ transform: translateY(-2px); box-shadow: 0 10px 25px -5px rgba(0, 0, 0, 0.1); }}
    .prose {{ color: #374151; }}
  </style>
</head>
<body class="bg-gray-50 min-h-screen">
  <div class="max-w-6xl mx-auto px-4 py-8">
    <header class="mb-10">
      <h1 class="text-3xl font-bold text-gray-900">📈 Tracked Company News</h1>
      <p class="text-gray-600 mt-2">Heuristic impact and value ratings with transparent scoring</p>
      <div class="mt-4 inline-flex items-center px-4 py-2 bg-white rounded-lg shadow-sm border border-gray-200">
        <span class="text-gray-700 font-medium">Run: {run_date}</span>
        <span class="mx-3 text-gray-300">|</span>
        <span class="text-gray-700">{selected} stories</span>
        <span class="mx-3 text-gray-300">|</span>
        <span class="text-gray-700">{company_count} companies</span>
      </div>
    </header>
    <main>
"#,
        run_date = escape_html(&run_date),
        selected = snapshot.news.len(),
        company_count = snapshot.companies.len(),
    )
    .unwrap();

    if snapshot.news.is_empty() {
        page.push_str(
            r#"      <div class="text-center py-12">
        <div class="text-5xl mb-4">📰</div>
        <h3 class="text-xl font-semibold text-gray-700 mb-2">No news today</h3>
        <p class="text-gray-500">Try again later or check the fetch logs.</p>
      </div>
"#,
        );
    } else {
        page.push_str("      <div class=\"space-y-6\">\n");
        for item in &snapshot.news {
            page.push_str(&render_card(item));
            page.push('\n');
        }
        page.push_str("      </div>\n");
    }

    page.push_str(
        r#"    </main>
    <footer class="mt-12 pt-8 border-t border-gray-200 text-center text-gray-400 text-sm">
      <p>⚠️ For reference only, not investment advice.</p>
    </footer>
  </div>
</body>
</html>
"#,
    );
    page
}

/// Render a snapshot and write the page to `output_path`.
#[instrument(level = "info", skip_all, fields(output_path = %output_path))]
pub async fn write_page(snapshot: &NewsSnapshot, output_path: &str) -> Result<(), Box<dyn Error>> {
    let html = render_page(snapshot);
    fs::write(output_path, html).await?;
    info!(path = %output_path, items = snapshot.news.len(), "Wrote HTML page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImpactHorizon, StockImpact};

    fn item(title: &str) -> NewsItem {
        NewsItem {
            id: "NVDA-1-1".to_string(),
            title: title.to_string(),
            summary: "财报显示营收增长 25%".to_string(),
            deep_summary: "公司公布财报，营收增长25%。".to_string(),
            url: "https://www.reuters.com/nvda".to_string(),
            source: "Reuters".to_string(),
            publish_time: "2026-08-26T09:00:00Z".to_string(),
            company: "NVDA".to_string(),
            value_score: 8.0,
            impact_score: 9,
            stock_impact: StockImpact {
                score: 9,
                horizon: ImpactHorizon::ShortTerm,
                level: "Critical".to_string(),
                description: "desc".to_string(),
            },
            key_data: vec!["25%".to_string()],
            important_info: vec![],
            logic_chain: "event → progress → meaning".to_string(),
        }
    }

    fn snapshot(news: Vec<NewsItem>) -> NewsSnapshot {
        NewsSnapshot {
            date: "2026-08-27T09:00:00Z".to_string(),
            total_searched: 9,
            selected: news.len(),
            companies: vec!["GOOGL".to_string(), "NVDA".to_string()],
            news,
        }
    }

    #[test]
    fn escape_html_covers_specials() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn star_rating_bounds() {
        assert_eq!(star_rating(10, 10.0), "★★★★★");
        assert_eq!(star_rating(1, 1.0), "★☆☆☆☆");
        assert_eq!(star_rating(5, 5.0), "★★★☆☆");
        for impact in 1..=10u8 {
            assert_eq!(star_rating(impact, 5.0).chars().count(), 5);
        }
    }

    #[test]
    fn render_card_escapes_article_text() {
        let rendered = render_card(&item("<script>alert(1)</script> earnings"));
        assert!(!rendered.contains("<script>"));
        assert!(rendered.contains("&lt;script&gt;"));
        assert!(rendered.contains("Read original"));
    }

    #[test]
    fn render_card_shows_scores_and_bands() {
        let rendered = render_card(&item("NVIDIA earnings"));
        assert!(rendered.contains("9/10"));
        assert!(rendered.contains("Critical"));
        assert!(rendered.contains("8/10"));
        assert!(rendered.contains("Based on:"));
        assert!(rendered.contains("bg-red-100"));
    }

    #[test]
    fn card_shows_source_domain() {
        let rendered = render_card(&item("NVIDIA earnings"));
        assert!(rendered.contains("Reuters · reuters.com"));
    }

    #[test]
    fn card_without_parseable_url_keeps_plain_source() {
        let mut no_url = item("NVIDIA earnings");
        no_url.url = String::new();
        let rendered = render_card(&no_url);
        assert!(rendered.contains(">Reuters<"));
        assert!(!rendered.contains(" · "));
    }

    #[test]
    fn render_page_with_items() {
        let html = render_page(&snapshot(vec![item("NVIDIA earnings beat")]));
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains("NVIDIA earnings beat"));
        assert!(html.contains("2026-08-27 09:00 UTC"));
        assert!(html.contains("1 stories"));
        assert!(html.contains("2 companies"));
        assert!(!html.contains("No news today"));
    }

    #[test]
    fn render_page_empty_state() {
        let html = render_page(&snapshot(vec![]));
        assert!(html.contains("No news today"));
    }

    #[test]
    fn impact_badge_thresholds() {
        assert_eq!(impact_badge_classes(9), "bg-red-100 text-red-800");
        assert_eq!(impact_badge_classes(6), "bg-yellow-100 text-yellow-800");
        assert_eq!(impact_badge_classes(2), "bg-green-100 text-green-800");
    }

    #[test]
    fn unknown_company_gets_default_style() {
        let (color, icon) = company_style("UNKNOWN");
        assert_eq!(color, "bg-gray-100 text-gray-800");
        assert_eq!(icon, "📰");
    }

    #[test]
    fn analysis_markdown_becomes_html() {
        let html = analysis_to_html("## Heading\n\n### Sub\n**Short term:** fine\nplain");
        assert!(html.contains("<h4"));
        assert!(html.contains("<h5"));
        assert!(html.contains("<strong>Short term:</strong>"));
        assert!(html.contains("<p>plain</p>"));
    }
}
