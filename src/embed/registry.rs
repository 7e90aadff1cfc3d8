use std::sync::Arc;

use url::Url;

use crate::embed::{EmbedFactory, EmbedType};

/// Factories with a higher priority are consulted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
}

/// Ordered set of embed factories.
#[derive(Default, Clone)]
pub struct EmbedRegistry {
    factories: Vec<(Priority, Arc<dyn EmbedFactory>)>,
}

impl EmbedRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register(&mut self, factory: Arc<dyn EmbedFactory>, priority: Priority) {
        // Stable insert keeps registration order within a priority.
        let pos = self.factories.iter().position(|(p, _)| *p < priority).unwrap_or(self.factories.len());
        self.factories.insert(pos, (priority, factory));
    }

    pub fn factory_for_url(&self, url: &Url) -> Option<Arc<dyn EmbedFactory>> {
        self.factories.iter().find(|(_, f)| f.can_handle_url(url)).map(|(_, f)| f.clone())
    }

    pub fn embed_types(&self) -> Vec<EmbedType> {
        let mut out: Vec<EmbedType> = Vec::with_capacity(self.factories.len());
        for (_, f) in &self.factories {
            let t = f.embed_type();
            if !out.contains(&t) { out.push(t); }
        }
        out
    }

    pub fn len(&self) -> usize { self.factories.len() }
    pub fn is_empty(&self) -> bool { self.factories.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::{OEmbedFactory, ProviderDefinition};

    fn oembed(def: ProviderDefinition) -> Arc<dyn EmbedFactory> {
        Arc::new(OEmbedFactory::from_definition(&def, reqwest::Client::new()).unwrap())
    }

    fn catch_all(name: &str) -> ProviderDefinition {
        ProviderDefinition {
            embed_type: name.into(),
            domains: vec!["*".into()],
            path_regex: ".*".into(),
            endpoint: "https://oembed.example/endpoint".into(),
            id_regex: "(?P<id>.+)".into(),
        }
    }

    #[test]
    fn unmatched_domain_has_no_factory() {
        let mut reg = EmbedRegistry::new();
        for def in ProviderDefinition::builtin() { reg.register(oembed(def), Priority::Normal); }
        assert!(reg.factory_for_url(&Url::parse("https://example.com/a.gif").unwrap()).is_none());
        let f = reg.factory_for_url(&Url::parse("https://i.imgur.com/abc.png").unwrap()).unwrap();
        assert_eq!(f.embed_type(), EmbedType::Imgur);
    }

    #[test]
    fn higher_priority_wins_then_registration_order() {
        let mut reg = EmbedRegistry::new();
        reg.register(oembed(catch_all("low")), Priority::Low);
        reg.register(oembed(ProviderDefinition::giphy()), Priority::Normal);
        reg.register(oembed(catch_all("first-high")), Priority::High);
        reg.register(oembed(catch_all("second-high")), Priority::High);

        let url = Url::parse("https://giphy.com/gifs/x").unwrap();
        assert_eq!(reg.factory_for_url(&url).unwrap().embed_type(), EmbedType::Custom("first-high".into()));
        assert_eq!(
            reg.embed_types(),
            vec![
                EmbedType::Custom("first-high".into()),
                EmbedType::Custom("second-high".into()),
                EmbedType::Giphy,
                EmbedType::Custom("low".into()),
            ]
        );
    }
}
