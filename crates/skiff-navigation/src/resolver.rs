//! Input resolution for the address bar
//!
//! 1. Blank input → the search engine's homepage
//! 2. Text with an explicit scheme → used as typed
//! 3. Something that looks like a hostname → `https://` prepended
//! 4. Anything else → search query
//!
//! Resolution never fails: unparseable input degrades to a search.

use url::Url;

use crate::engine::SearchEngine;

#[derive(Debug, Clone, Copy, Default)]
pub struct AddressResolver {
    engine: SearchEngine,
}

impl AddressResolver {
    pub fn new(engine: SearchEngine) -> Self {
        Self { engine }
    }

    pub fn set_search_engine(&mut self, engine: SearchEngine) {
        self.engine = engine;
    }

    pub fn search_engine(&self) -> SearchEngine {
        self.engine
    }

    /// Resolve address bar text into a destination URL
    pub fn resolve(&self, input: &str) -> String {
        let input = input.trim();

        if input.is_empty() {
            return self.engine.homepage().to_string();
        }

        // Explicit scheme: trust the user
        if Url::parse(input).is_ok() {
            return input.to_string();
        }

        if let Some(url) = Self::try_bare_hostname(input) {
            return url;
        }

        self.engine.search_url(input)
    }

    fn try_bare_hostname(input: &str) -> Option<String> {
        let with_https = format!("https://{input}");
        let parsed = Url::parse(&with_https).ok()?;
        let host = parsed.host_str()?;

        Self::is_likely_hostname(host).then_some(with_https)
    }

    fn is_likely_hostname(host: &str) -> bool {
        !host.is_empty() && !host.contains(char::is_whitespace) && host.contains('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_uses_homepage() {
        let resolver = AddressResolver::new(SearchEngine::DuckDuckGo);
        assert_eq!(resolver.resolve(""), "https://duckduckgo.com");
        assert_eq!(resolver.resolve("   "), "https://duckduckgo.com");
    }

    #[test]
    fn test_explicit_scheme_is_trusted() {
        let resolver = AddressResolver::default();
        assert_eq!(
            resolver.resolve("https://example.com/path"),
            "https://example.com/path"
        );
        assert_eq!(resolver.resolve("  about:blank "), "about:blank");
        assert_eq!(resolver.resolve("mailto:me@example.com"), "mailto:me@example.com");
    }

    #[test]
    fn test_bare_hostname_gets_https() {
        let resolver = AddressResolver::default();
        assert_eq!(resolver.resolve("example.com"), "https://example.com");
        assert_eq!(
            resolver.resolve("docs.rs/tokio/latest"),
            "https://docs.rs/tokio/latest"
        );
    }

    #[test]
    fn test_everything_else_is_a_search() {
        let resolver = AddressResolver::new(SearchEngine::Bing);
        assert_eq!(
            resolver.resolve("swift ui"),
            "https://www.bing.com/search?q=swift%20ui"
        );
        // no dot in host
        assert_eq!(
            resolver.resolve("intranet"),
            "https://www.bing.com/search?q=intranet"
        );
    }

    #[test]
    fn test_engine_can_be_switched() {
        let mut resolver = AddressResolver::new(SearchEngine::Google);
        resolver.set_search_engine(SearchEngine::DuckDuckGo);
        assert_eq!(resolver.search_engine(), SearchEngine::DuckDuckGo);
        assert_eq!(resolver.resolve("rust"), "https://duckduckgo.com/?q=rust");
    }
}
