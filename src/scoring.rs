//! Heuristic impact and value scoring for news items.
//!
//! Two independent 1–10 ratings are computed for every item:
//!
//! - **Impact**: expected effect on the stock price, driven by a fixed
//!   keyword→weight table matched against the headline and snippet.
//! - **Value**: informational richness of the snippet, driven by numeric
//!   facts, analysis language, authoritative-source language, and length.
//!
//! Both start from a base of 5, accumulate additively without bound, and are
//! clamped into [1,10] at the end. The tables are bilingual because the
//! search queries return a mix of Chinese and English coverage. Scoring is
//! pure and deterministic: the same text always yields the same score.

use crate::models::{ImpactHorizon, StockImpact};
use crate::utils::contains_keyword;
use once_cell::sync::Lazy;
use regex::Regex;

/// Keyword weights for the impact score, matched case-insensitively against
/// `title + " " + summary`. English entries match whole words only; Chinese
/// entries match as substrings.
pub static IMPACT_KEYWORDS: Lazy<Vec<(&'static str, i32)>> = Lazy::new(|| {
    vec![
        // earnings and capital structure
        ("财报", 2),
        ("earnings", 2),
        ("盈利", 2),
        ("profit", 2),
        ("亏损", 2),
        ("loss", 2),
        ("营收", 2),
        ("revenue", 2),
        ("净利润", 2),
        ("net income", 2),
        ("并购", 3),
        ("merger", 3),
        ("收购", 3),
        ("acquisition", 3),
        ("分拆", 3),
        ("spin-off", 3),
        ("重组", 3),
        ("restructuring", 3),
        // regulatory and legal
        ("监管", 2),
        ("regulator", 2),
        ("调查", 2),
        ("investigation", 2),
        ("罚款", 2),
        ("fine", 2),
        ("诉讼", 2),
        ("lawsuit", 2),
        // leadership
        ("ceo", 1),
        ("高管", 1),
        ("executive", 1),
        ("辞职", 1),
        ("resign", 1),
        ("任命", 1),
        ("appoint", 1),
        // business progress
        ("发布", 1),
        ("launch", 1),
        ("推出", 1),
        ("上市", 1),
        ("listing", 1),
        ("合作", 1),
        ("partnership", 1),
        ("增长", 1),
        ("growth", 1),
        ("下滑", 1),
        ("decline", 1),
        ("突破", 1),
        ("breakthrough", 1),
        ("创新", 1),
        ("innovation", 1),
        ("订单", 1),
        ("order", 1),
        ("签约", 1),
        ("投资", 1),
        ("investment", 1),
        ("融资", 1),
        ("financing", 1),
        // magnitude markers
        ("亿元", 1),
        ("亿美元", 1),
        ("billion", 1),
    ]
});

/// Analysis-language markers used by the value score.
pub static ANALYSIS_KEYWORDS: &[&str] = &[
    "分析", "解读", "认为", "指出", "预计", "预测", "趋势", "analysis", "analyst", "forecast",
    "outlook", "expects", "trend",
];

/// Authoritative-source markers used by the value score.
pub static AUTHORITATIVE_KEYWORDS: &[&str] = &[
    "财报", "公告", "官方", "证监会", "交易所", "earnings report", "filing", "official",
    "regulator", "exchange",
];

/// Headline keywords that indicate a direct, near-term price effect.
static HIGH_IMPACT_TITLE_KEYWORDS: &[&str] = &[
    "财报", "盈利", "亏损", "营收", "净利润", "增长率", "回购", "拆分", "earnings", "profit",
    "loss", "revenue", "buyback",
];

/// Headline keywords for medium-horizon business developments.
static MEDIUM_IMPACT_TITLE_KEYWORDS: &[&str] = &[
    "产品发布", "新品", "技术突破", "合作", "协议", "订单", "launch", "partnership",
    "agreement", "order",
];

/// Matches a number carrying a magnitude or percent unit, in either language.
static NUMERIC_FACT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(\.\d+)?\s*(亿|万|百万|千万|%|percent|billion|million)").unwrap()
});

/// One row of a score band table: the lowest score that maps into the band.
#[derive(Debug)]
pub struct ScoreBand {
    pub min: u8,
    pub level: &'static str,
    pub description: &'static str,
}

/// Impact bands, highest first. Lookup takes the first band whose `min` is
/// not above the score, so the table must stay sorted descending.
pub static IMPACT_BANDS: &[ScoreBand] = &[
    ScoreBand {
        min: 9,
        level: "Critical",
        description: "Major strategic shift, M&A, regulatory action, or earnings far off expectations",
    },
    ScoreBand {
        min: 7,
        level: "High",
        description: "Major product launch, executive change, market share move, or quarterly earnings",
    },
    ScoreBand {
        min: 5,
        level: "Moderate",
        description: "Business progress, partnerships, technical advances, industry trends",
    },
    ScoreBand {
        min: 3,
        level: "Low",
        description: "Routine operational updates, market chatter, analyst commentary",
    },
    ScoreBand {
        min: 1,
        level: "Minimal",
        description: "Day-to-day news and company events with no price relevance",
    },
];

/// Value bands, highest first.
pub static VALUE_BANDS: &[ScoreBand] = &[
    ScoreBand {
        min: 9,
        level: "Essential",
        description: "Exclusive information or deep analysis with decisive bearing on positioning",
    },
    ScoreBand {
        min: 7,
        level: "High value",
        description: "Substantial data and detailed analysis worth factoring into decisions",
    },
    ScoreBand {
        min: 5,
        level: "Useful",
        description: "Regular coverage with some reference value",
    },
    ScoreBand {
        min: 3,
        level: "Thin",
        description: "Surface-level or repetitive content of limited use",
    },
    ScoreBand {
        min: 1,
        level: "Noise",
        description: "No substantive content",
    },
];

fn clamp_score(raw: i32) -> u8 {
    raw.clamp(1, 10) as u8
}

/// Compute the impact score for a news item.
///
/// Base 5, plus the table weight of every keyword found in the lowercased
/// concatenation of title and summary, clamped into [1,10].
pub fn impact_score(title: &str, summary: &str) -> u8 {
    let text = format!("{} {}", title, summary).to_lowercase();
    let mut score = 5i32;
    for (keyword, points) in IMPACT_KEYWORDS.iter() {
        if contains_keyword(&text, keyword) {
            score += points;
        }
    }
    clamp_score(score)
}

/// Compute the value score for a news item's snippet.
///
/// Base 5; +1 each for a numeric fact with a unit, analysis language,
/// authoritative-source language, content over 500 chars, and content over
/// 1000 chars. The query priority weight is applied before the final clamp
/// so breaking-tier items outrank analysis-tier items at equal raw score.
/// Returned with one decimal of precision.
pub fn value_score(summary: &str, priority_weight: f64) -> f64 {
    let mut score = 5i32;

    if NUMERIC_FACT_RE.is_match(summary) {
        score += 1;
    }
    if contains_any(summary, ANALYSIS_KEYWORDS) {
        score += 1;
    }
    if contains_any(summary, AUTHORITATIVE_KEYWORDS) {
        score += 1;
    }

    let chars = summary.chars().count();
    if chars > 500 {
        score += 1;
    }
    if chars > 1000 {
        score += 1;
    }

    let weighted = f64::from(score) * priority_weight;
    (weighted.clamp(1.0, 10.0) * 10.0).round() / 10.0
}

/// Look up the band a score falls into.
pub fn band_for(score: u8, bands: &'static [ScoreBand]) -> &'static ScoreBand {
    bands
        .iter()
        .find(|band| score >= band.min)
        .unwrap_or(&bands[bands.len() - 1])
}

/// Classify the horizon over which a headline is expected to move the stock.
pub fn impact_horizon(title: &str) -> ImpactHorizon {
    let title = title.to_lowercase();
    if HIGH_IMPACT_TITLE_KEYWORDS
        .iter()
        .any(|k| contains_keyword(&title, k))
    {
        ImpactHorizon::ShortTerm
    } else if MEDIUM_IMPACT_TITLE_KEYWORDS
        .iter()
        .any(|k| contains_keyword(&title, k))
    {
        ImpactHorizon::MediumTerm
    } else {
        ImpactHorizon::LongTerm
    }
}

/// Build the full impact classification for a news item.
pub fn stock_impact(title: &str, summary: &str) -> StockImpact {
    let score = impact_score(title, summary);
    let band = band_for(score, IMPACT_BANDS);
    StockImpact {
        score,
        horizon: impact_horizon(title),
        level: band.level.to_string(),
        description: band.description.to_string(),
    }
}

/// Which dimension a scoring-basis explanation is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Impact,
    Value,
}

/// Name the keyword families that contributed to a score, for display next
/// to the rating on the rendered page.
pub fn scoring_basis(title: &str, summary: &str, kind: ScoreKind) -> Vec<&'static str> {
    let text = format!("{} {}", title, summary).to_lowercase();
    let mut bases = Vec::new();

    match kind {
        ScoreKind::Impact => {
            if contains_any(&text, &["财报", "盈利", "营收", "earnings", "profit", "revenue"]) {
                bases.push("earnings data");
            }
            if contains_any(&text, &["并购", "收购", "重组", "merger", "acquisition"]) {
                bases.push("capital transactions");
            }
            if contains_any(&text, &["监管", "调查", "政策", "regulator", "investigation"]) {
                bases.push("regulatory factors");
            }
            if contains_any(&text, &["发布", "推出", "上市", "launch", "listing"]) {
                bases.push("product launches");
            }
            if bases.is_empty() {
                bases.push("routine operations");
            }
        }
        ScoreKind::Value => {
            if contains_any(&text, &["分析", "解读", "认为", "analysis", "analyst"]) {
                bases.push("analytical depth");
            }
            if NUMERIC_FACT_RE.is_match(&text) {
                bases.push("data richness");
            }
            if contains_any(&text, &["趋势", "预测", "预计", "trend", "forecast", "outlook"]) {
                bases.push("forward-looking view");
            }
            if bases.is_empty() {
                bases.push("basic information");
            }
        }
    }

    bases
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| contains_keyword(text, k))
}
