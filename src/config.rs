use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::embed::service::DEFAULT_TTL_SECS;
use crate::embed::ProviderDefinition;
use crate::error::{ForumError, Result};
use crate::theme::Theme;

pub const ENV_EMBED_TTL: &str = "FORUMKIT_EMBED_TTL_SECS";
pub const ENV_DATABASE_URL: &str = "FORUMKIT_DATABASE_URL";

fn default_ttl() -> i64 { DEFAULT_TTL_SECS }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_user_agent() -> String { format!("forumkit/{}", env!("CARGO_PKG_VERSION")) }

#[derive(Debug, Deserialize, Clone)]
pub struct EmbedConfig {
    #[serde(default = "default_ttl")]
    pub cache_ttl_secs: i64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Registered after the built-in providers.
    #[serde(default)]
    pub providers: Vec<ProviderDefinition>,
}

impl Default for EmbedConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: default_ttl(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            providers: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub embed: EmbedConfig,
    #[serde(default)]
    pub theme: Option<Theme>,
}

impl Config {
    /// Default location: `<config dir>/forumkit/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "forumkit", "forumkit").map(|p| p.config_dir().join("config.toml"))
    }

    /// Load `path` (or the default location). A missing file yields defaults.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Self::default().with_env().validate(),
        };
        let cfg = match std::fs::read_to_string(&path) {
            Ok(s) => Self::from_toml_str(&s).map_err(|source| ForumError::ConfigParse { path: path.clone(), source })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Self::default()
            }
            Err(source) => return Err(ForumError::ConfigRead { path, source }),
        };
        cfg.with_env().validate()
    }

    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> { toml::from_str(s) }

    fn with_env(mut self) -> Self {
        if let Some(ttl) = std::env::var(ENV_EMBED_TTL).ok().and_then(|s| s.parse().ok()) {
            self.embed.cache_ttl_secs = ttl;
        }
        if let Ok(url) = std::env::var(ENV_DATABASE_URL) {
            if !url.trim().is_empty() { self.database_url = Some(url); }
        }
        self
    }

    fn validate(self) -> Result<Self> {
        if self.embed.cache_ttl_secs < 0 {
            return Err(ForumError::InvalidConfig {
                field: "embed.cache_ttl_secs",
                message: format!("must not be negative (got {})", self.embed.cache_ttl_secs),
            });
        }
        Ok(self)
    }

    /// Built-ins followed by configured providers.
    pub fn providers(&self) -> Vec<ProviderDefinition> {
        let mut all = ProviderDefinition::builtin();
        all.extend(self.embed.providers.iter().cloned());
        all
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(self.embed.timeout_ms))
            .user_agent(self.embed.user_agent.clone())
            .build()?;
        Ok(client)
    }
}
