//! Hostname derivation for tagging evidence.

use url::Url;

/// Extracts the normalized domain of `url`.
///
/// The result is the lowercase hostname with a trailing dot and a leading
/// `www.` removed. Returns an empty string for anything that does not parse
/// as an absolute URL with a host; this function never fails.
pub fn extract_domain(url: &str) -> String {
    let Some(host) = Url::parse(url.trim())
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_lowercase))
    else {
        return String::new();
    };

    let host = host.trim_end_matches('.');
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

#[cfg(test)]
mod tests {
    use super::extract_domain;

    #[test]
    fn extracts_host_from_common_url_shapes() {
        let cases = [
            ("https://github.com/user/repo", "github.com"),
            ("http://medium.com/article", "medium.com"),
            ("https://www.techcrunch.com/news", "techcrunch.com"),
            ("https://subdomain.example.com/path", "subdomain.example.com"),
            ("https://Example.COM:8443?q=1", "example.com"),
            ("https://user:pw@hbr.org/x", "hbr.org"),
            ("https://example.com./trailing-dot", "example.com"),
            ("  https://github.com/user/repo-name_with-special.chars  ", "github.com"),
        ];
        for (url, expected) in cases {
            assert_eq!(extract_domain(url), expected, "url: {url}");
        }
    }

    #[test]
    fn follows_lenient_browser_url_parsing() {
        let cases = [
            ("https://news.example.org\\story", "news.example.org"),
            ("https:news.example.org/story", "news.example.org"),
            ("https://news.example.org\t/story", "news.example.org"),
            ("HTTPS://WWW.News.Example.org/story", "news.example.org"),
        ];
        for (url, expected) in cases {
            assert_eq!(extract_domain(url), expected, "url: {url:?}");
        }
    }

    #[test]
    fn malformed_or_hostless_urls_yield_empty_domain() {
        for url in [
            "",
            "not-a-valid-url",
            "https://",
            "github.com/x",
            "://nohost",
            "https:// spaced.com",
            "mailto:someone@example.com",
        ] {
            assert_eq!(extract_domain(url), "", "url: {url}");
        }
    }
}
