use std::sync::Arc;

use futures::stream::{self, StreamExt};
use serde_json::Value;
use url::Url;

use crate::embed::{Embed, EmbedFactory, EmbedRegistry, EmbedType, OEmbedFactory, Priority, ProviderDefinition};
use crate::error::{ForumError, Result};
use crate::storage::Storage;

pub const CACHE_PREFIX: &str = "embed|";
pub const DEFAULT_TTL_SECS: i64 = 24 * 60 * 60;
/// Cache lifetime for embeds the provider could not identify.
pub const DEGRADED_TTL_SECS: i64 = 5 * 60;
const BATCH_CONCURRENCY: usize = 4;

/// Resolves pasted URLs into embeds through the registry, with a write-through cache.
pub struct EmbedService {
    registry: EmbedRegistry,
    storage: Arc<dyn Storage>,
    ttl_secs: i64,
}

impl EmbedService {
    /// Negative TTLs are treated as zero.
    pub fn new(registry: EmbedRegistry, storage: Arc<dyn Storage>, ttl_secs: i64) -> Self {
        Self { registry, storage, ttl_secs: ttl_secs.max(0) }
    }

    /// Register an oEmbed factory per definition, in order, at normal priority.
    pub fn with_providers(
        defs: &[ProviderDefinition],
        http: reqwest::Client,
        storage: Arc<dyn Storage>,
        ttl_secs: i64,
    ) -> Result<Self> {
        let mut registry = EmbedRegistry::new();
        for def in defs {
            let factory = OEmbedFactory::from_definition(def, http.clone())?;
            registry.register(Arc::new(factory), Priority::Normal);
        }
        Ok(Self::new(registry, storage, ttl_secs))
    }

    pub fn registry(&self) -> &EmbedRegistry { &self.registry }

    pub fn register(&mut self, factory: Arc<dyn EmbedFactory>, priority: Priority) {
        self.registry.register(factory, priority);
    }

    /// Resolve `url`, serving from the cache unless `refresh`.
    ///
    /// Embeds without a provider id (failed or unrecognised lookups) are
    /// cached for at most [`DEGRADED_TTL_SECS`] so a provider outage clears
    /// up quickly; everything else lives for the configured TTL.
    pub async fn create_embed_for_url(&self, url: &str, refresh: bool) -> Result<Embed> {
        let parsed = Url::parse(url.trim())
            .map_err(|source| ForumError::InvalidUrl { url: url.to_string(), source })?;
        let factory = self.registry
            .factory_for_url(&parsed)
            .ok_or_else(|| ForumError::NoMatchingFactory { url: url.to_string() })?;

        let key = cache_key(url.trim());
        let now = current_epoch();
        if !refresh {
            match self.storage.get_cache(&key, now).await {
                Ok(Some(payload)) => match serde_json::from_str::<Embed>(&payload) {
                    Ok(embed) => {
                        tracing::debug!(%url, "embed cache hit");
                        return Ok(embed);
                    }
                    Err(e) => tracing::warn!(%url, error = %e, "discarding unreadable cached embed"),
                },
                Ok(None) => tracing::debug!(%url, "embed cache miss"),
                Err(e) => tracing::warn!(%url, error = %e, "embed cache read failed"),
            }
        }

        let embed = factory.create_embed_for_url(url.trim()).await;
        match serde_json::to_string(&embed) {
            Ok(payload) => {
                if let Err(e) = self.storage.put_cache(&key, &payload, now.saturating_add(self.ttl_for(&embed))).await {
                    tracing::warn!(%url, error = %e, "embed cache write failed");
                }
            }
            Err(e) => tracing::warn!(%url, error = %e, "embed not cacheable"),
        }
        Ok(embed)
    }

    fn ttl_for(&self, embed: &Embed) -> i64 {
        if embed.provider_id().is_none() { self.ttl_secs.min(DEGRADED_TTL_SECS) } else { self.ttl_secs }
    }

    /// Resolve several URLs concurrently. Results keep the input order.
    pub async fn create_embeds_for_urls(&self, urls: &[String]) -> Vec<Result<Embed>> {
        stream::iter(urls.iter())
            .map(|u| self.create_embed_for_url(u, false))
            .buffered(BATCH_CONCURRENCY)
            .collect()
            .await
    }

    /// Rebuild an embed from previously stored JSON, checking it against registered types.
    pub fn create_embed_from_data(&self, data: Value) -> Result<Embed> {
        let embed: Embed = serde_json::from_value(data)
            .map_err(|e| ForumError::InvalidEmbedData(e.to_string()))?;
        if !self.registry.embed_types().contains(embed.embed_type()) {
            return Err(ForumError::InvalidEmbedData(format!("unknown embed type `{}`", embed.embed_type())));
        }
        if embed.url().trim().is_empty() {
            return Err(ForumError::InvalidEmbedData("url must not be empty".into()));
        }
        Ok(embed)
    }

    pub fn supports(&self, embed_type: &EmbedType) -> bool {
        self.registry.embed_types().contains(embed_type)
    }

    pub async fn clear_cache(&self, prefix: Option<&str>) -> Result<u64> {
        let prefix = prefix.map(|p| format!("{}{}", CACHE_PREFIX, p));
        self.storage
            .clear_cache_prefix(Some(prefix.as_deref().unwrap_or(CACHE_PREFIX)))
            .await
            .map_err(ForumError::Storage)
    }
}

fn cache_key(url: &str) -> String { format!("{}{}", CACHE_PREFIX, url) }

pub(crate) fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
