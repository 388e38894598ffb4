//! Small helpers: log truncation, output-directory probing, URL domains.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes with an ellipsis and byte count
/// appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Keyword containment for mixed Chinese/English keyword tables.
///
/// CJK keywords match as plain substrings, since Chinese text has no word
/// separators. ASCII keywords only match at word boundaries, so "appoint"
/// does not fire inside "disappointing" and "ai" does not fire inside
/// "said". Callers lowercase the text; keywords are stored lowercase.
pub fn contains_keyword(text: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return text.contains(keyword);
    }

    let mut from = 0;
    while let Some(pos) = text[from..].find(keyword) {
        let begin = from + pos;
        let end = begin + keyword.len();
        let clear = |c: Option<char>| c.map_or(true, |c| !c.is_ascii_alphanumeric());
        if clear(text[..begin].chars().next_back()) && clear(text[end..].chars().next()) {
            return true;
        }
        // ASCII match start, so begin + 1 is a valid char boundary.
        from = begin + 1;
    }
    false
}

/// Bare domain of a URL, without a leading `www.`.
///
/// Returns `None` for anything `url::Url` cannot parse or that has no host.
pub fn domain_of(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if missing, then probes it with a throwaway file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
