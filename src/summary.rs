//! Heuristic article summarization.
//!
//! Fetched page bodies arrive as raw HTML with navigation chrome, bylines,
//! ads, and leftover script text mixed into the article. The summarizer runs
//! a fixed sequence of regex substitutions to strip all of that, then keeps
//! only the sentences that mention at least one core finance keyword.
//!
//! Guarantees:
//! - never panics, whatever the input;
//! - absent or garbage input falls back to the title;
//! - every stripping pass is idempotent (cleaning twice equals cleaning once).

use crate::utils::contains_keyword;
use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Characters worth keeping: CJK, alphanumerics, and common punctuation.
/// Everything else (mojibake, control chars, emoji, leftover angle brackets)
/// is dropped.
static CHARSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\u{4e00}-\u{9fa5}a-zA-Z0-9，。；：“”‘’（）【】、%+\-*/=!?．.,:;()\s]"#).unwrap()
});

/// Bylines and dateline labels, in either language, up to the next sentence
/// break.
static BYLINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(来源|发布时间|作者|记者|编辑|source|author|editor|reporter)\s*[：:][^\n。]*")
        .unwrap()
});
static ORIGIN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"本文来自[^\n。]*").unwrap());
static BRACKET_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"【[^】]*】").unwrap());
static CTA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)下载APP|扫码关注|点击查看|官方账号|官方澎湃号|媒体号|download the app")
        .unwrap()
});
static SERVER_NOISE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)stgw|nginx|cloudflare|window\.|function\(|var |let |const ").unwrap()
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Markers of a failed fetch that slipped through as a 200 body.
static FETCH_FAILURE_MARKERS: &[&str] = &["302 Found", "403 Forbidden", "NotFound"];

/// Sentences must mention one of these to survive extraction. English
/// entries match whole words only; Chinese entries match as substrings.
pub static CORE_KEYWORDS: &[&str] = &[
    "营收", "净利润", "增长", "下降", "同比", "环比", "发布", "推出", "合作", "投资", "收购",
    "财报", "业绩", "股价", "涨", "跌", "产能", "销量", "收入", "利润", "技术", "产品",
    "revenue", "profit", "growth", "decline", "launch", "partnership", "investment",
    "acquisition", "earnings", "share", "capacity", "sales", "income", "technology", "product",
    "ai",
];

/// Remove script and style blocks, then every remaining tag.
pub fn strip_markup(text: &str) -> String {
    let text = SCRIPT_RE.replace_all(text, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    TAG_RE.replace_all(&text, " ").into_owned()
}

/// Remove bylines, bracket tags, calls to action, leftover server/JS noise,
/// and stray characters, then collapse whitespace.
pub fn strip_boilerplate(text: &str) -> String {
    let text = CHARSET_RE.replace_all(text, " ");
    let text = BYLINE_RE.replace_all(&text, "");
    let text = ORIGIN_RE.replace_all(&text, "");
    let text = BRACKET_TAG_RE.replace_all(&text, "");
    let text = CTA_RE.replace_all(&text, "");
    let text = SERVER_NOISE_RE.replace_all(&text, "");
    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}

/// Full cleaning pass: markup first, boilerplate second.
pub fn clean(text: &str) -> String {
    strip_boilerplate(&strip_markup(text))
}

/// Split cleaned text into sentences and keep the ones that carry a core
/// keyword and meaningful length.
pub fn extract_key_sentences(text: &str) -> Vec<String> {
    static SENTENCE_SPLIT_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[。；！？]|[.!?]\s").unwrap());

    SENTENCE_SPLIT_RE
        .split(text)
        .map(str::trim)
        .filter(|sentence| sentence.chars().count() > 10)
        .filter(|sentence| {
            let lowered = sentence.to_lowercase();
            CORE_KEYWORDS.iter().any(|k| contains_keyword(&lowered, k))
        })
        .map(str::to_string)
        .collect()
}

/// Summarize a fetched article body.
///
/// Returns the extracted key sentences joined back together, or a
/// title-based fallback when the body is absent, unfetchable, or cleans
/// down to nothing.
pub fn summarize(title: &str, raw_body: &str) -> String {
    let failed_fetch = FETCH_FAILURE_MARKERS
        .iter()
        .any(|marker| raw_body.contains(marker));
    if failed_fetch || raw_body.trim().chars().count() < 50 {
        return format!("{title}. See the original article for details.");
    }

    let cleaned = clean(raw_body);
    if cleaned.chars().count() < 50 {
        return title.to_string();
    }

    let sentences = extract_key_sentences(&cleaned);
    if sentences.is_empty() {
        // Nothing matched the keyword list; fall back to a plain prefix.
        return cleaned.chars().take(500).collect::<String>().trim().to_string();
    }

    let has_cjk = cleaned
        .chars()
        .any(|c| ('\u{4e00}'..='\u{9fa5}').contains(&c));
    let (separator, terminator) = if has_cjk { ("。", '。') } else { (". ", '.') };

    let mut summary = sentences.join(separator);
    if !summary.ends_with(terminator) {
        summary.push(terminator);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHINESE_BODY: &str = "<html><head><style>body { color: red; }</style>\
        <script>var tracker = 1; function(load) {}</script></head><body>\
        <p>来源：新浪财经。公司今日发布财报，第三季度营收同比增长25%，净利润达到50亿元。\
        分析师认为数据中心业务将持续增长。【广告】下载APP查看更多精彩内容。</p></body></html>";

    #[test]
    fn summarize_keeps_key_sentences_and_drops_chrome() {
        let summary = summarize("公司财报", CHINESE_BODY);
        assert!(summary.contains("营收同比增长25%"), "summary: {summary}");
        assert!(summary.contains("持续增长"));
        assert!(!summary.contains('<'));
        assert!(!summary.contains("来源"));
        assert!(!summary.contains("下载APP"));
        assert!(!summary.contains("tracker"));
        assert!(summary.ends_with('。'));
    }

    #[test]
    fn summarize_falls_back_on_empty_input() {
        let summary = summarize("NVIDIA earnings beat", "");
        assert!(summary.starts_with("NVIDIA earnings beat"));
        assert!(summary.contains("original article"));
    }

    #[test]
    fn summarize_falls_back_on_error_pages() {
        for body in ["302 Found", "403 Forbidden blah blah", "NotFound"] {
            let summary = summarize("Title here", body);
            assert!(summary.starts_with("Title here"));
        }
    }

    #[test]
    fn summarize_falls_back_when_cleaning_leaves_nothing() {
        // Long enough to pass the raw-length gate, empty after tag stripping.
        let body = format!("<div>{}</div>", "<br/>".repeat(40));
        assert_eq!(summarize("Just The Title", &body), "Just The Title");
    }

    #[test]
    fn summarize_never_panics_on_malformed_input() {
        let inputs = [
            "<<<>>>",
            "<div",
            "\u{0}\u{1}\u{2}",
            "����������������������������������������������������",
            "<p>unterminated <script>alert(1)",
        ];
        for input in inputs {
            let _ = summarize("t", input);
        }
    }

    #[test]
    fn english_bodies_extract_keyword_sentences() {
        let body = "The company reported strong quarterly earnings today and management \
            raised guidance for the year. Revenue grew 25% from the prior period on data \
            center demand. The press event ran long and ended with a concert. "
            .repeat(1);
        let summary = summarize("Earnings", &body);
        assert!(summary.contains("quarterly earnings"));
        assert!(summary.contains("Revenue grew 25%"));
        assert!(!summary.contains("concert"));
    }

    #[test]
    fn clean_is_idempotent() {
        let inputs = [
            CHINESE_BODY,
            "plain text with no markup at all, long enough to matter",
            "来源：某报。正文在这里。【标签】window.onload",
            "<b>bold</b> and <i>italic</i> text",
            "a < b > c math-ish text",
        ];
        for input in inputs {
            let once = clean(input);
            let twice = clean(&once);
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn strip_markup_removes_nested_tags() {
        let out = strip_markup("<div><p>hello <b>world</b></p></div>");
        assert!(!out.contains('<'));
        assert!(out.contains("hello"));
        assert!(out.contains("world"));
    }

    #[test]
    fn strip_boilerplate_collapses_whitespace() {
        let out = strip_boilerplate("a    b\n\n\tc");
        assert_eq!(out, "a b c");
    }

    #[test]
    fn keyword_gate_ignores_embedded_english_words() {
        // "ai" inside "said" must not keep a junk sentence.
        let junk = extract_key_sentences("The chairman said hello to the visiting delegation. ");
        assert!(junk.is_empty());

        let kept = extract_key_sentences("The company unveiled a new AI accelerator for data centers. ");
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn extract_key_sentences_respects_length_floor() {
        // Contains a keyword but too short to keep.
        let sentences = extract_key_sentences("营收增长。这是一条足够长的句子，提到了净利润和产品情况。");
        assert_eq!(sentences.len(), 1);
        assert!(sentences[0].contains("净利润"));
    }
}
