//! Deep-analysis text generation for rendered news cards.
//!
//! Builds a structured markdown block per item: core points pulled from the
//! summary, highlighted numeric facts, and a short/long-term impact read.
//! All of it is keyword-driven heuristics over the already-cleaned summary
//! text; there is no model anywhere.

use crate::models::NewsItem;
use crate::utils::contains_keyword;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::Write;

/// Numbers with a currency or magnitude unit, worth highlighting.
static KEY_DATA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(\.\d+)?(亿|万|百万|千万|%|billion|million)?(元|美元|港元)?").unwrap()
});

static SENTENCE_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[。！？]|[.!?]\s").unwrap());

/// Verbs that mark a sentence as carrying an actual development.
static KEY_VERBS: &[&str] = &[
    "公布", "发布", "宣布", "表示", "预计", "增长", "下降", "突破", "创新", "合作",
    "announced", "reported", "launched", "expects", "grew", "fell", "signed",
];

/// Key information extracted from a summary for the analysis block.
#[derive(Debug, Default)]
pub struct KeyInformation {
    /// Up to three sentences that carry a development verb.
    pub core_points: Vec<String>,
    /// Up to five highlighted numeric facts.
    pub important_data: Vec<String>,
    pub investment_focus: Option<&'static str>,
    pub risks: Option<&'static str>,
    pub opportunities: Option<&'static str>,
}

/// Pull core points, numeric facts, and a coarse investment read out of a
/// summary.
pub fn extract_key_information(text: &str) -> KeyInformation {
    let mut info = KeyInformation::default();
    if text.is_empty() {
        return info;
    }

    info.important_data = KEY_DATA_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .filter(|m| m.chars().count() > 1)
        .take(5)
        .collect();

    info.core_points = SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|s| s.chars().count() > 10)
        .filter(|s| {
            let lowered = s.to_lowercase();
            KEY_VERBS.iter().any(|v| contains_keyword(&lowered, v))
        })
        .take(3)
        .map(str::to_string)
        .collect();

    if contains_any(text, &["增长", "提升", "改善", "growth", "improve"]) {
        info.investment_focus = Some("earnings growth drivers");
        info.opportunities = Some("improving results may support a re-rating");
    }
    if contains_any(text, &["下滑", "下降", "亏损", "decline", "loss"]) {
        info.investment_focus = Some("earnings pressure");
        info.risks = Some("deteriorating results may weigh on the share price");
    }
    if contains_any(text, &["创新", "技术", "研发", "innovation", "technology", "r&d"]) {
        info.investment_focus = Some("technology and innovation capability");
        info.opportunities = Some("technical progress may build a durable competitive edge");
    }

    info
}

/// One-line short-term impact read, keyed on headline/summary signals.
pub fn assess_short_term_impact(title: &str, summary: &str) -> &'static str {
    let text = format!("{title} {summary}").to_lowercase();
    if contains_any(&text, &["财报", "业绩", "盈利", "earnings", "results"]) {
        "Direct price driver; key information for the earnings window"
    } else if contains_any(&text, &["并购", "收购", "重组", "merger", "acquisition"]) {
        "Can move the stock sharply; watch the transaction terms"
    } else if contains_any(&text, &["监管", "调查", "罚款", "regulator", "investigation"]) {
        "Likely to weigh on sentiment in the near term"
    } else if contains_any(&text, &["合作", "签约", "订单", "partnership", "order", "contract"]) {
        "Positive headline; may lift market confidence"
    } else {
        "Limited near-term price effect; read against the market backdrop"
    }
}

/// One-line long-term impact read.
pub fn assess_long_term_impact(title: &str, summary: &str) -> &'static str {
    let text = format!("{title} {summary}").to_lowercase();
    if contains_any(&text, &["战略", "转型", "布局", "strategy", "transformation"]) {
        "Shapes the long-term direction of the business; keep tracking"
    } else if contains_any(&text, &["技术", "创新", "研发", "technology", "innovation"]) {
        "Strengthens long-run competitiveness; watch commercialization"
    } else if contains_any(&text, &["市场", "份额", "竞争", "market", "share", "competition"]) {
        "Bears on market position and long-run growth potential"
    } else if contains_any(&text, &["监管", "政策", "合规", "regulator", "policy", "compliance"]) {
        "May reshape the operating environment for the industry"
    } else {
        "Long-term relevance depends on the fundamentals"
    }
}

/// Build the full deep-analysis markdown block for one item.
pub fn deep_analysis(item: &NewsItem) -> String {
    let info = extract_key_information(&item.deep_summary);
    let mut md = String::new();

    writeln!(md, "## Analysis: {}\n", item.title).unwrap();
    writeln!(md, "**Source: {}**\n", item.source).unwrap();

    writeln!(md, "### Core points").unwrap();
    if info.core_points.is_empty() {
        let preview: String = item.deep_summary.chars().take(100).collect();
        writeln!(md, "- {preview}...").unwrap();
    } else {
        for (i, point) in info.core_points.iter().enumerate() {
            writeln!(md, "{}. **{}**", i + 1, point).unwrap();
        }
    }
    md.push('\n');

    if !info.important_data.is_empty() {
        writeln!(md, "### Key data").unwrap();
        for data in &info.important_data {
            writeln!(md, "- **{data}**").unwrap();
        }
        md.push('\n');
    }

    writeln!(md, "### Business impact").unwrap();
    writeln!(
        md,
        "**Short term:** {}\n",
        assess_short_term_impact(&item.title, &item.deep_summary)
    )
    .unwrap();
    writeln!(
        md,
        "**Long term:** {}\n",
        assess_long_term_impact(&item.title, &item.deep_summary)
    )
    .unwrap();

    writeln!(md, "### Positioning notes").unwrap();
    writeln!(
        md,
        "1. **Watch:** {}",
        info.investment_focus.unwrap_or("changes in the fundamentals")
    )
    .unwrap();
    writeln!(
        md,
        "2. **Risk:** {}",
        info.risks.unwrap_or("general market volatility")
    )
    .unwrap();
    writeln!(
        md,
        "3. **Opportunity:** {}",
        info.opportunities
            .unwrap_or("depends on the market environment")
    )
    .unwrap();
    md.push('\n');

    writeln!(md, "### Summary").unwrap();
    writeln!(md, "{}", item.deep_summary).unwrap();

    md
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_keyword(text, k))
}
