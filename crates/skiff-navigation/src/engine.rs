//! Search engine provider
//!
//! Each engine knows its homepage, how to build search and suggestion
//! URLs, and how to parse its own suggestion payload. Payload parsing
//! dispatches on the engine, never on the payload's shape.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::NavigationError;

/// Unreserved characters (RFC 3986) stay literal; everything else,
/// including `&`, `=` and space, is escaped.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    Bing,
    #[serde(rename = "duckduckgo")]
    DuckDuckGo,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 3] = [
        SearchEngine::Google,
        SearchEngine::Bing,
        SearchEngine::DuckDuckGo,
    ];

    /// User-facing name
    pub fn title(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Bing => "Bing",
            SearchEngine::DuckDuckGo => "DuckDuckGo",
        }
    }

    pub fn homepage(&self) -> &'static str {
        match self {
            SearchEngine::Google => "https://www.google.com",
            SearchEngine::Bing => "https://www.bing.com",
            SearchEngine::DuckDuckGo => "https://duckduckgo.com",
        }
    }

    /// Search results URL for `query`; a blank query yields the homepage.
    pub fn search_url(&self, query: &str) -> String {
        let query = query.trim();
        if query.is_empty() {
            return self.homepage().to_string();
        }

        let encoded = encode_query(query);
        match self {
            SearchEngine::Google => format!("https://www.google.com/search?q={encoded}"),
            SearchEngine::Bing => format!("https://www.bing.com/search?q={encoded}"),
            SearchEngine::DuckDuckGo => format!("https://duckduckgo.com/?q={encoded}"),
        }
    }

    pub fn suggestions_url(&self, query: &str) -> String {
        let encoded = encode_query(query.trim());
        match self {
            SearchEngine::Google => format!(
                "https://suggestqueries.google.com/complete/search?client=firefox&q={encoded}"
            ),
            SearchEngine::Bing => format!("https://api.bing.com/osjson.aspx?query={encoded}"),
            SearchEngine::DuckDuckGo => format!("https://duckduckgo.com/ac/?q={encoded}"),
        }
    }

    /// Parses a raw suggestion payload into ordered phrases.
    ///
    /// Google and Bing answer in OpenSearch form (`["q", ["a", "b"], ...]`),
    /// DuckDuckGo with `[{"phrase": "a"}, ...]`. Anything else yields an
    /// empty list.
    pub fn parse_suggestions(&self, payload: &[u8]) -> Vec<String> {
        let Ok(json) = serde_json::from_slice::<Value>(payload) else {
            return Vec::new();
        };

        match self {
            SearchEngine::DuckDuckGo => json
                .as_array()
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.get("phrase")?.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
            SearchEngine::Google | SearchEngine::Bing => json
                .as_array()
                .and_then(|array| array.get(1))
                .and_then(Value::as_array)
                .map(|phrases| {
                    phrases
                        .iter()
                        .filter_map(|p| p.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
            SearchEngine::DuckDuckGo => "duckduckgo",
        }
    }
}

fn encode_query(query: &str) -> String {
    utf8_percent_encode(query, QUERY_ENCODE_SET).to_string()
}

impl std::fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SearchEngine {
    type Err = NavigationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(SearchEngine::Google),
            "bing" => Ok(SearchEngine::Bing),
            "duckduckgo" => Ok(SearchEngine::DuckDuckGo),
            _ => Err(NavigationError::UnknownEngine(s.to_string())),
        }
    }
}
