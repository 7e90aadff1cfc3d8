pub mod factory;
pub mod oembed;
pub mod provider;
pub mod registry;
pub mod service;

pub use factory::EmbedFactory;
pub use oembed::{OEmbedFactory, OEmbedResponse};
pub use provider::ProviderDefinition;
pub use registry::{EmbedRegistry, Priority};
pub use service::EmbedService;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which provider produced an embed. Serialized as its plain string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EmbedType {
    Imgur,
    Giphy,
    Custom(String),
}

impl EmbedType {
    pub fn as_str(&self) -> &str {
        match self {
            EmbedType::Imgur => "imgur",
            EmbedType::Giphy => "giphy",
            EmbedType::Custom(s) => s,
        }
    }
}

impl From<String> for EmbedType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "imgur" => EmbedType::Imgur,
            "giphy" => EmbedType::Giphy,
            _ => EmbedType::Custom(s),
        }
    }
}

impl From<&str> for EmbedType {
    fn from(s: &str) -> Self { EmbedType::from(s.to_string()) }
}

impl From<EmbedType> for String {
    fn from(t: EmbedType) -> Self {
        match t {
            EmbedType::Custom(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for EmbedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Externally hosted rich media resolved from a pasted URL.
///
/// Built once by a factory and never mutated afterwards; the `with_*`
/// setters consume the value so they only apply during construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embed {
    embed_type: EmbedType,
    url: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    provider_id: Option<String>,
}

impl Embed {
    pub fn new(embed_type: EmbedType, url: impl Into<String>) -> Self {
        Self { embed_type, url: url.into(), name: String::new(), height: None, width: None, provider_id: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self { self.name = name.into(); self }
    pub fn with_dimensions(mut self, height: Option<u32>, width: Option<u32>) -> Self {
        self.height = height;
        self.width = width;
        self
    }
    pub fn with_provider_id(mut self, id: Option<String>) -> Self { self.provider_id = id; self }

    pub fn embed_type(&self) -> &EmbedType { &self.embed_type }
    /// The URL the user pasted, not the provider's media URL.
    pub fn url(&self) -> &str { &self.url }
    pub fn name(&self) -> &str { &self.name }
    pub fn height(&self) -> Option<u32> { self.height }
    pub fn width(&self) -> Option<u32> { self.width }
    pub fn provider_id(&self) -> Option<&str> { self.provider_id.as_deref() }
}
