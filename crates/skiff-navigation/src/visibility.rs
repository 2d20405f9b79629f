//! User-visible URL rule shared by the tracker and the history recorder.

use url::Url;

/// The rendering surface's empty-document placeholder.
pub const BLANK_URL: &str = "about:blank";

const INTERNAL_SCHEME: &str = "about";

/// A URL is user-visible unless it is the blank placeholder or uses the
/// surface's internal scheme.
pub fn is_user_visible(url: &str) -> bool {
    if url == BLANK_URL {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => parsed.scheme() != INTERNAL_SCHEME,
        Err(_) => !url
            .get(..INTERNAL_SCHEME.len() + 1)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("about:")),
    }
}

/// Host component of `url`, if it parses and has a non-empty one.
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .filter(|h| !h.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_are_hidden() {
        assert!(!is_user_visible("about:blank"));
        assert!(!is_user_visible("about:srcdoc"));
        assert!(!is_user_visible("ABOUT:blank"));
    }

    #[test]
    fn test_regular_pages_are_visible() {
        assert!(is_user_visible("https://example.com"));
        assert!(is_user_visible("http://localhost:8080/about"));
        assert!(is_user_visible("file:///tmp/page.html"));
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://news.ycombinator.com/item?id=1").as_deref(),
            Some("news.ycombinator.com")
        );
        assert_eq!(host_of("about:blank"), None);
        assert_eq!(host_of("not a url"), None);
    }
}
