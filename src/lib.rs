pub mod config;
pub mod db;
pub mod embed;
pub mod error;
pub mod render;
pub mod storage;
pub mod theme;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::embed::{Embed, EmbedFactory, EmbedType, Priority, ProviderDefinition};
    pub use crate::error::{ForumError, Result};
    pub use crate::render::{CategoriesPage, CategoryNode, DisplayAs, PageHooks};
    pub use crate::theme::button::ButtonTypes;
    pub use crate::theme::{Color, Theme, ThemeCache};
    pub use crate::ForumKit;
}

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::embed::{Embed, EmbedFactory, EmbedService, EmbedType, Priority};
use crate::error::{ForumError, Result};
use crate::render::{CategoriesPage, PageHooks};
use crate::storage::{MemoryStorage, Storage};
use crate::theme::{Theme, ThemeCache};

/// Library entry point. Owns the embed service and points at the process-wide theme cache.
pub struct ForumKit {
    embeds: EmbedService,
    themes: &'static ThemeCache,
}

impl ForumKit {
    /// Open (and optionally migrate) the SQLite embed cache named by the config.
    pub async fn connect(config: &Config, run_migrations: bool) -> Result<Self> {
        let db = Database::connect(config.database_url.as_deref()).await.map_err(ForumError::Storage)?;
        if run_migrations { db.run_migrations().await.map_err(ForumError::Storage)?; }
        match db.purge_expired(embed::service::current_epoch()).await {
            Ok(n) if n > 0 => tracing::debug!(purged = n, "dropped expired embeds"),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "could not purge expired embeds"),
        }
        Self::with_storage(config, Arc::new(db))
    }

    /// Keep cached embeds in process memory only.
    pub fn in_memory(config: &Config) -> Result<Self> {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    /// Build the kit over `storage`.
    ///
    /// The theme cache is process-wide: this switches it to the config's theme,
    /// or back to the default theme when the config has none.
    pub fn with_storage(config: &Config, storage: Arc<dyn Storage>) -> Result<Self> {
        let http = config.http_client()?;
        let embeds = EmbedService::with_providers(&config.providers(), http, storage, config.embed.cache_ttl_secs)?;
        let themes = ThemeCache::global();
        themes.set_theme(config.theme.clone().unwrap_or_default());
        Ok(Self { embeds, themes })
    }

    pub fn embeds(&self) -> &EmbedService { &self.embeds }

    /// Register an extra factory ahead of (or behind) the configured providers.
    pub fn register_factory(&mut self, factory: Arc<dyn EmbedFactory>, priority: Priority) {
        self.embeds.register(factory, priority);
    }

    pub fn embed_types(&self) -> Vec<EmbedType> { self.embeds.registry().embed_types() }

    pub async fn create_embed(&self, url: &str, refresh: bool) -> Result<Embed> {
        self.embeds.create_embed_for_url(url, refresh).await
    }

    pub async fn create_embeds(&self, urls: &[String]) -> Vec<Result<Embed>> {
        self.embeds.create_embeds_for_urls(urls).await
    }

    pub async fn clear_embed_cache(&self, prefix: Option<&str>) -> Result<u64> {
        self.embeds.clear_cache(prefix).await
    }

    pub fn themes(&self) -> &'static ThemeCache { self.themes }

    /// Switch the active theme; cached style variables are dropped if it differs.
    pub fn set_theme(&self, theme: Theme) -> bool { self.themes.set_theme(theme) }

    pub fn render_categories(&self, page: &CategoriesPage, hooks: &dyn PageHooks) -> String {
        render::render_categories_page(page, hooks)
    }
}
