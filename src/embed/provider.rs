use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::embed::EmbedType;
use crate::error::{ForumError, Result};

pub const IMGUR_COM: &str = "imgur.com";
pub const IMGUR_OEMBED_URL: &str = "https://api.imgur.com/oembed";
pub const GIPHY_COM: &str = "giphy.com";
pub const GIPHY_SHORT: &str = "gph.is";
pub const GIPHY_OEMBED_URL: &str = "https://giphy.com/services/oembed";

/// Name of the capture group every `id_regex` must define.
pub const ID_GROUP: &str = "id";

fn default_path_regex() -> String { ".+".to_string() }

/// Declarative description of an oEmbed provider, as written in config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDefinition {
    pub embed_type: String,
    pub domains: Vec<String>,
    #[serde(default = "default_path_regex")]
    pub path_regex: String,
    pub endpoint: String,
    /// Applied to the `url` field of the oEmbed response.
    pub id_regex: String,
}

impl ProviderDefinition {
    pub fn imgur() -> Self {
        Self {
            embed_type: "imgur".into(),
            domains: vec![IMGUR_COM.into()],
            // Imgur paths are too varied to pre-filter; the oEmbed endpoint decides.
            path_regex: default_path_regex(),
            endpoint: IMGUR_OEMBED_URL.into(),
            id_regex: r"/(?P<id>[a-zA-Z0-9]+)(\.[a-zA-Z0-9]+)?$".into(),
        }
    }

    pub fn giphy() -> Self {
        Self {
            embed_type: "giphy".into(),
            domains: vec![GIPHY_COM.into(), GIPHY_SHORT.into()],
            path_regex: default_path_regex(),
            endpoint: GIPHY_OEMBED_URL.into(),
            // e.g. https://media.giphy.com/media/kW8mnYSNkUYKc/giphy.gif
            id_regex: r"/media/(?P<id>[a-zA-Z0-9]+)/giphy\.gif$".into(),
        }
    }

    pub fn builtin() -> Vec<Self> { vec![Self::imgur(), Self::giphy()] }

    /// Point the provider at a different oEmbed endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn compile(&self) -> Result<CompiledProvider> {
        let name = self.embed_type.trim();
        if name.is_empty() {
            return Err(self.invalid("embed_type", "must not be empty".into()));
        }
        let domains: Vec<String> = self.domains.iter()
            .map(|d| d.trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();
        if domains.is_empty() {
            return Err(self.invalid("domains", "at least one domain is required".into()));
        }
        url::Url::parse(&self.endpoint).map_err(|e| self.invalid("endpoint", e.to_string()))?;
        let path_regex = Regex::new(&self.path_regex).map_err(|e| self.invalid("path_regex", e.to_string()))?;
        let id_regex = Regex::new(&self.id_regex).map_err(|e| self.invalid("id_regex", e.to_string()))?;
        if !id_regex.capture_names().flatten().any(|n| n == ID_GROUP) {
            return Err(self.invalid("id_regex", format!("missing named group `{}`", ID_GROUP)));
        }
        Ok(CompiledProvider {
            embed_type: EmbedType::from(name),
            domains,
            path_regex,
            endpoint: self.endpoint.clone(),
            id_regex,
        })
    }

    fn invalid(&self, field: &'static str, message: String) -> ForumError {
        ForumError::InvalidProvider { provider: self.embed_type.clone(), field, message }
    }
}

/// A validated provider with its regexes built.
#[derive(Debug, Clone)]
pub struct CompiledProvider {
    pub embed_type: EmbedType,
    pub domains: Vec<String>,
    pub path_regex: Regex,
    pub endpoint: String,
    pub id_regex: Regex,
}

impl CompiledProvider {
    /// The `id` capture of `id_regex` over a provider media URL.
    pub fn extract_id(&self, media_url: &str) -> Option<String> {
        self.id_regex
            .captures(media_url)
            .and_then(|c| c.name(ID_GROUP))
            .map(|m| m.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn giphy_id_is_the_capture_group() {
        let p = ProviderDefinition::giphy().compile().unwrap();
        assert_eq!(
            p.extract_id("https://media.giphy.com/media/kW8mnYSNkUYKc/giphy.gif").as_deref(),
            Some("kW8mnYSNkUYKc")
        );
        assert_eq!(p.extract_id("https://media.giphy.com/media/kW8mnYSNkUYKc/other.gif"), None);
    }

    #[test]
    fn imgur_id_ignores_extension() {
        let p = ProviderDefinition::imgur().compile().unwrap();
        assert_eq!(p.extract_id("https://i.imgur.com/AbC123x.jpg").as_deref(), Some("AbC123x"));
        assert_eq!(p.extract_id("https://i.imgur.com/AbC123x").as_deref(), Some("AbC123x"));
    }

    #[test]
    fn id_regex_without_named_group_is_rejected() {
        let mut def = ProviderDefinition::giphy();
        def.id_regex = r"/media/([a-z]+)".into();
        let err = def.compile().unwrap_err();
        assert!(matches!(err, ForumError::InvalidProvider { field: "id_regex", .. }));
    }

    #[test]
    fn blank_domains_are_rejected() {
        let mut def = ProviderDefinition::imgur();
        def.domains = vec!["  ".into()];
        assert!(matches!(def.compile(), Err(ForumError::InvalidProvider { field: "domains", .. })));
    }

    #[test]
    fn config_definition_defaults_path_regex() {
        let def: ProviderDefinition = toml::from_str(
            r#"
            embed_type = "flickr"
            domains = ["flickr.com", "flic.kr"]
            endpoint = "https://www.flickr.com/services/oembed"
            id_regex = "/(?P<id>[0-9]+)_"
            "#,
        ).unwrap();
        assert_eq!(def.path_regex, ".+");
        let p = def.compile().unwrap();
        assert_eq!(p.embed_type, EmbedType::Custom("flickr".into()));
    }
}
