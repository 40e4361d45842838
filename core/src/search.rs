//! Search box routing: direct navigation or a query against an engine.

use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use url::form_urlencoded;

static DIRECT_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^(http|https)://[^ "]+$"#).expect("valid direct URL regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    DuckDuckGo,
    Baidu,
    Sogou,
    So360,
    Zhihu,
    Bilibili,
    GitHub,
    StackOverflow,
    Mdn,
    Baike,
}

impl SearchEngine {
    pub const ALL: [Self; 12] = [
        Self::Google,
        Self::Bing,
        Self::DuckDuckGo,
        Self::Baidu,
        Self::Sogou,
        Self::So360,
        Self::Zhihu,
        Self::Bilibili,
        Self::GitHub,
        Self::StackOverflow,
        Self::Mdn,
        Self::Baike,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Bing => "bing",
            Self::DuckDuckGo => "duckduckgo",
            Self::Baidu => "baidu",
            Self::Sogou => "sogou",
            Self::So360 => "so360",
            Self::Zhihu => "zhihu",
            Self::Bilibili => "bilibili",
            Self::GitHub => "github",
            Self::StackOverflow => "stackoverflow",
            Self::Mdn => "mdn",
            Self::Baike => "baike",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Bing => "Bing",
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Baidu => "百度一下",
            Self::Sogou => "搜狗搜索",
            Self::So360 => "360 搜索",
            Self::Zhihu => "知乎搜索",
            Self::Bilibili => "哔哩哔哩",
            Self::GitHub => "GitHub",
            Self::StackOverflow => "Stack Overflow",
            Self::Mdn => "MDN Docs",
            Self::Baike => "百度百科",
        }
    }

    /// Query URL prefix; the encoded query is appended verbatim.
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search?q=",
            Self::Bing => "https://www.bing.com/search?q=",
            Self::DuckDuckGo => "https://duckduckgo.com/?q=",
            Self::Baidu => "https://www.baidu.com/s?wd=",
            Self::Sogou => "https://www.sogou.com/web?query=",
            Self::So360 => "https://www.so.com/s?q=",
            Self::Zhihu => "https://www.zhihu.com/search?q=",
            Self::Bilibili => "https://search.bilibili.com/all?keyword=",
            Self::GitHub => "https://github.com/search?q=",
            Self::StackOverflow => "https://stackoverflow.com/search?q=",
            Self::Mdn => "https://developer.mozilla.org/zh-CN/search?q=",
            Self::Baike => "https://baike.baidu.com/search?word=",
        }
    }

    #[must_use]
    pub fn query_url(self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}{encoded}", self.base_url())
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEngine(pub String);

impl fmt::Display for UnknownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown search engine '{}'", self.0)
    }
}

impl Error for UnknownEngine {}

impl FromStr for SearchEngine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|engine| engine.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}

/// Where a submitted search should go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchTarget {
    /// The input already is an http(s) URL.
    Direct(String),
    Engine { engine: SearchEngine, url: String },
}

impl SearchTarget {
    #[must_use]
    pub fn url(&self) -> &str {
        match self {
            Self::Direct(url) | Self::Engine { url, .. } => url,
        }
    }
}

/// Route a submitted query. Blank input goes nowhere.
#[must_use]
pub fn route_query(query: &str, engine: SearchEngine) -> Option<SearchTarget> {
    if query.trim().is_empty() {
        return None;
    }
    if DIRECT_URL.is_match(query) {
        return Some(SearchTarget::Direct(query.to_string()));
    }
    Some(SearchTarget::Engine {
        engine,
        url: engine.query_url(query),
    })
}
