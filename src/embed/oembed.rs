use std::time::Instant;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::embed::factory::EmbedFactory;
use crate::embed::provider::{CompiledProvider, ProviderDefinition};
use crate::embed::{Embed, EmbedType};
use crate::error::Result;

/// The subset of an oEmbed response we read. Every field is optional.
///
/// Example (giphy):
/// `{"width": 650, "title": "Hello GIF", "url": "https://media.giphy.com/media/kW8mnYSNkUYKc/giphy.gif", "type": "photo", "height": 491}`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OEmbedResponse {
    pub url: Option<String>,
    pub title: Option<String>,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

impl OEmbedResponse {
    /// Lenient extraction: wrong types degrade to `None` instead of failing.
    pub fn from_value(v: &Value) -> Self {
        Self {
            url: v.get("url").and_then(Value::as_str).map(str::to_string),
            title: v.get("title").and_then(Value::as_str).map(str::to_string),
            height: v.get("height").and_then(dimension),
            width: v.get("width").and_then(dimension),
        }
    }
}

// Providers send dimensions as numbers or numeric strings.
fn dimension(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Factory that asks a provider's oEmbed endpoint about a URL.
pub struct OEmbedFactory {
    provider: CompiledProvider,
    http: reqwest::Client,
}

impl OEmbedFactory {
    pub fn new(provider: CompiledProvider, http: reqwest::Client) -> Self {
        Self { provider, http }
    }

    pub fn from_definition(def: &ProviderDefinition, http: reqwest::Client) -> Result<Self> {
        Ok(Self::new(def.compile()?, http))
    }

    pub fn provider(&self) -> &CompiledProvider { &self.provider }

    async fn fetch(&self, url: &str) -> anyhow::Result<Value> {
        let value = self.http
            .get(&self.provider.endpoint)
            .query(&[("url", url)])
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(value)
    }

    /// Map a provider response onto an embed for the pasted `url`.
    pub fn embed_from_response(&self, url: &str, response: &OEmbedResponse) -> Embed {
        let provider_id = response.url.as_deref().and_then(|u| self.provider.extract_id(u));
        Embed::new(self.provider.embed_type.clone(), url)
            .with_name(response.title.clone().unwrap_or_default())
            .with_dimensions(response.height, response.width)
            .with_provider_id(provider_id)
    }
}

#[async_trait]
impl EmbedFactory for OEmbedFactory {
    fn embed_type(&self) -> EmbedType { self.provider.embed_type.clone() }

    fn supported_domains(&self) -> &[String] { &self.provider.domains }

    fn supported_path_regex(&self, _domain: &str) -> &Regex { &self.provider.path_regex }

    async fn create_embed_for_url(&self, url: &str) -> Embed {
        let start = Instant::now();
        let response = match self.fetch(url).await {
            Ok(v) => OEmbedResponse::from_value(&v),
            Err(e) => {
                tracing::warn!(provider = %self.provider.embed_type, %url, error = %e, "oEmbed request failed");
                OEmbedResponse::default()
            }
        };
        tracing::debug!(provider = %self.provider.embed_type, %url, elapsed = ?start.elapsed(), "oEmbed lookup finished");
        self.embed_from_response(url, &response)
    }
}
