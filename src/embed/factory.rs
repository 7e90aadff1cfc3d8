use async_trait::async_trait;
use regex::Regex;
use url::Url;

use crate::embed::{Embed, EmbedType};

/// Supported-domain entry that matches every host.
pub const WILDCARD_DOMAIN: &str = "*";

/// Turns a URL from one family of domains into an [`Embed`].
#[async_trait]
pub trait EmbedFactory: Send + Sync {
    fn embed_type(&self) -> EmbedType;

    /// Domains this factory accepts. Sub-domains of each entry match too.
    fn supported_domains(&self) -> &[String];

    /// Regex the URL path must match for the given (lower-cased) host.
    fn supported_path_regex(&self, domain: &str) -> &Regex;

    fn can_handle_url(&self, url: &Url) -> bool {
        match url.scheme() { "http" | "https" => {}, _ => return false }
        let Some(host) = url.host_str() else { return false; };
        let host = host.to_ascii_lowercase();
        if !self.supported_domains().iter().any(|d| domain_matches(&host, d)) {
            return false;
        }
        self.supported_path_regex(&host).is_match(url.path())
    }

    /// Build the embed. Remote failures degrade the result instead of erroring.
    async fn create_embed_for_url(&self, url: &str) -> Embed;
}

/// Host equals `supported`, is a sub-domain of it, or `supported` is the wildcard.
pub fn domain_matches(host: &str, supported: &str) -> bool {
    let s = supported.trim().to_ascii_lowercase();
    if s == WILDCARD_DOMAIN { return true; }
    let s = s.strip_prefix("*.").unwrap_or(&s);
    if s.is_empty() { return false; }
    host == s || host.ends_with(&format!(".{}", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed {
        domains: Vec<String>,
        path: Regex,
    }

    #[async_trait]
    impl EmbedFactory for Fixed {
        fn embed_type(&self) -> EmbedType { EmbedType::Custom("fixed".into()) }
        fn supported_domains(&self) -> &[String] { &self.domains }
        fn supported_path_regex(&self, _domain: &str) -> &Regex { &self.path }
        async fn create_embed_for_url(&self, url: &str) -> Embed { Embed::new(self.embed_type(), url) }
    }

    fn fixed(domains: &[&str], path: &str) -> Fixed {
        Fixed { domains: domains.iter().map(|d| d.to_string()).collect(), path: Regex::new(path).unwrap() }
    }

    #[test]
    fn matches_exact_and_sub_domains() {
        assert!(domain_matches("imgur.com", "imgur.com"));
        assert!(domain_matches("i.imgur.com", "imgur.com"));
        assert!(domain_matches("i.imgur.com", "*.imgur.com"));
        assert!(!domain_matches("notimgur.com", "imgur.com"));
        assert!(!domain_matches("imgur.com.evil.net", "imgur.com"));
        assert!(domain_matches("anything.example", "*"));
    }

    #[test]
    fn rejects_non_http_schemes_and_unmatched_paths() {
        let f = fixed(&["example.com"], r"^/media/.+");
        assert!(f.can_handle_url(&Url::parse("https://example.com/media/abc").unwrap()));
        assert!(f.can_handle_url(&Url::parse("http://WWW.Example.com/media/abc").unwrap()));
        assert!(!f.can_handle_url(&Url::parse("ftp://example.com/media/abc").unwrap()));
        assert!(!f.can_handle_url(&Url::parse("https://example.com/other").unwrap()));
        assert!(!f.can_handle_url(&Url::parse("https://example.org/media/abc").unwrap()));
    }
}
