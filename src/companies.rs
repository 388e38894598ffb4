//! Static configuration for the tracked companies.
//!
//! Five companies are tracked: Google, NVIDIA, Tesla, Tencent, and Kweichow
//! Moutai. Each carries three prioritized search queries covering three
//! recency tiers: breaking news (last day), significant news (last three
//! days), and analysis pieces (last three days, lowest priority). The tables
//! here are hand-authored and never mutated at runtime.

use crate::search::TimeRange;
use once_cell::sync::Lazy;

/// A single search query with its recency window and priority tier.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    pub query: &'static str,
    pub time_range: TimeRange,
    /// 1 = breaking, 2 = significant, 3 = analysis.
    pub priority: u8,
}

/// Static description of one tracked company.
#[derive(Debug, Clone)]
pub struct CompanyConfig {
    pub key: &'static str,
    pub name: &'static str,
    pub ticker: &'static str,
    /// Tailwind classes for the rendered badge.
    pub color: &'static str,
    pub icon: &'static str,
    pub queries: [QuerySpec; 3],
}

/// Domains whose coverage we treat as authoritative finance reporting.
///
/// Search results are filtered against this list first; other domains are
/// only admitted to top a query's results up to a minimum count.
pub const AUTHORITY_SOURCES: &[&str] = &[
    // Chinese finance outlets
    "caixin.com",
    "eeo.com.cn",
    "yicai.com",
    "stcn.com",
    "cnstock.com.cn",
    "cs.com.cn",
    "cls.cn",
    "wallstreetcn.com",
    "nbd.com.cn",
    "eastmoney.com",
    "10jqka.com.cn",
    "xueqiu.com",
    "cninfo.com.cn",
    "finance.sina.com.cn",
    "jiemian.com",
    // international outlets
    "bloomberg.com",
    "reuters.com",
    "ft.com",
    "wsj.com",
];

/// Maximum results requested per query.
pub const MAX_ITEMS_PER_QUERY: usize = 3;
/// Hard cap on the number of items in a snapshot.
pub const FINAL_NEWS_COUNT: usize = 10;
/// Items kept per company after per-company ranking.
pub const MAX_ITEMS_PER_COMPANY: usize = 3;

pub static COMPANIES: Lazy<Vec<CompanyConfig>> = Lazy::new(|| {
    vec![
        CompanyConfig {
            key: "google",
            name: "Google",
            ticker: "GOOGL",
            color: "bg-blue-100 text-blue-800",
            icon: "🔍",
            queries: [
                QuerySpec {
                    query: "Google 谷歌 最新新闻 今天 实时",
                    time_range: TimeRange::OneDay,
                    priority: 1,
                },
                QuerySpec {
                    query: "Google Alphabet 财报 盈利 AI产品发布",
                    time_range: TimeRange::ThreeDays,
                    priority: 2,
                },
                QuerySpec {
                    query: "Google GOOGL 股价 分析 投资",
                    time_range: TimeRange::ThreeDays,
                    priority: 3,
                },
            ],
        },
        CompanyConfig {
            key: "nvidia",
            name: "NVIDIA",
            ticker: "NVDA",
            color: "bg-green-100 text-green-800",
            icon: "💻",
            queries: [
                QuerySpec {
                    query: "NVIDIA 英伟达 最新新闻 今天",
                    time_range: TimeRange::OneDay,
                    priority: 1,
                },
                QuerySpec {
                    query: "NVIDIA 财报 GPU AI芯片 产品发布",
                    time_range: TimeRange::ThreeDays,
                    priority: 2,
                },
                QuerySpec {
                    query: "NVDA 股价 分析 投资",
                    time_range: TimeRange::ThreeDays,
                    priority: 3,
                },
            ],
        },
        CompanyConfig {
            key: "tesla",
            name: "Tesla",
            ticker: "TSLA",
            color: "bg-red-100 text-red-800",
            icon: "🚗",
            queries: [
                QuerySpec {
                    query: "Tesla 特斯拉 最新新闻 今天",
                    time_range: TimeRange::OneDay,
                    priority: 1,
                },
                QuerySpec {
                    query: "Tesla 财报 电动车 自动驾驶 马斯克",
                    time_range: TimeRange::ThreeDays,
                    priority: 2,
                },
                QuerySpec {
                    query: "TSLA 股价 分析 投资",
                    time_range: TimeRange::ThreeDays,
                    priority: 3,
                },
            ],
        },
        CompanyConfig {
            key: "tencent",
            name: "Tencent",
            ticker: "0700.HK",
            color: "bg-purple-100 text-purple-800",
            icon: "🎮",
            queries: [
                QuerySpec {
                    query: "腾讯 最新新闻 今天",
                    time_range: TimeRange::OneDay,
                    priority: 1,
                },
                QuerySpec {
                    query: "腾讯 财报 游戏 社交 投资",
                    time_range: TimeRange::ThreeDays,
                    priority: 2,
                },
                QuerySpec {
                    query: "0700.HK 股价 分析 投资",
                    time_range: TimeRange::ThreeDays,
                    priority: 3,
                },
            ],
        },
        CompanyConfig {
            key: "maotai",
            name: "Kweichow Moutai",
            ticker: "600519.SS",
            color: "bg-amber-100 text-amber-800",
            icon: "🍶",
            queries: [
                QuerySpec {
                    query: "茅台 最新新闻 今天",
                    time_range: TimeRange::OneDay,
                    priority: 1,
                },
                QuerySpec {
                    query: "茅台 财报 白酒 消费",
                    time_range: TimeRange::ThreeDays,
                    priority: 2,
                },
                QuerySpec {
                    query: "600519.SS 股价 分析 投资",
                    time_range: TimeRange::ThreeDays,
                    priority: 3,
                },
            ],
        },
    ]
});

/// Ranking weight applied to a query's items by priority tier.
/// Breaking news outranks analysis pieces at equal raw score.
pub fn priority_weight(priority: u8) -> f64 {
    match priority {
        1 => 1.5,
        2 => 1.2,
        _ => 1.0,
    }
}

/// Check whether a URL belongs to an authoritative finance domain.
pub fn is_authority_source(url: &str) -> bool {
    match crate::utils::domain_of(url) {
        Some(domain) => AUTHORITY_SOURCES
            .iter()
            .any(|source| domain == *source || domain.ends_with(&format!(".{source}"))),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_companies_with_three_queries_each() {
        assert_eq!(COMPANIES.len(), 5);
        for company in COMPANIES.iter() {
            assert_eq!(company.queries.len(), 3);
            assert_eq!(company.queries[0].priority, 1);
            assert_eq!(company.queries[0].time_range, TimeRange::OneDay);
        }
    }

    #[test]
    fn authority_source_matching() {
        assert!(is_authority_source("https://www.reuters.com/markets/nvidia"));
        assert!(is_authority_source("https://finance.caixin.com/article"));
        assert!(is_authority_source("https://cls.cn/detail/123"));
        assert!(!is_authority_source("https://example-blog.com/nvidia"));
        assert!(!is_authority_source("not a url"));
    }

    #[test]
    fn authority_match_is_not_substring_match() {
        // "notreuters.com" must not pass because "reuters.com" appears inside it.
        assert!(!is_authority_source("https://notreuters.com/story"));
    }

    #[test]
    fn priority_weights_are_ordered() {
        assert!(priority_weight(1) > priority_weight(2));
        assert!(priority_weight(2) > priority_weight(3));
        assert_eq!(priority_weight(3), 1.0);
        assert_eq!(priority_weight(9), 1.0);
    }
}
