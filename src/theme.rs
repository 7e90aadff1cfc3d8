pub mod button;
pub mod color;
pub mod css;
pub mod merge;
pub mod variables;

pub use color::{modify_color_based_on_lightness, Color};
pub use variables::{global_variables, GlobalVariables, VariableFactory};

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_THEME_KEY: &str = "default";

/// A theme: its identity plus overrides keyed component -> sub-element -> token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub key: String,
    #[serde(default)]
    pub variables: Map<String, Value>,
}

impl Default for Theme {
    fn default() -> Self { Self { key: DEFAULT_THEME_KEY.to_string(), variables: Map::new() } }
}

impl Theme {
    /// Non-object `variables` are treated as no overrides.
    pub fn new(key: impl Into<String>, variables: Value) -> Self {
        let variables = match variables {
            Value::Object(m) => m,
            _ => Map::new(),
        };
        Self { key: key.into(), variables }
    }

    /// Overrides for one sub-element of a component, if the theme has any.
    pub fn overrides(&self, component: &str, sub: &str) -> Option<&Value> {
        self.variables.get(component)?.get(sub)
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

struct CacheState {
    theme: Arc<Theme>,
    generation: u64,
    entries: HashMap<&'static str, Entry>,
}

/// Memoizes generated style variables for the current theme.
///
/// Entries live until the theme changes. Generators run without the lock held,
/// so one cached generator may call another.
pub struct ThemeCache {
    state: RwLock<CacheState>,
}

impl Default for ThemeCache {
    fn default() -> Self { Self::new(Theme::default()) }
}

impl ThemeCache {
    pub fn new(theme: Theme) -> Self {
        Self {
            state: RwLock::new(CacheState { theme: Arc::new(theme), generation: 0, entries: HashMap::new() }),
        }
    }

    /// The process-wide cache, starting on the default theme.
    pub fn global() -> &'static ThemeCache {
        static GLOBAL: OnceLock<ThemeCache> = OnceLock::new();
        GLOBAL.get_or_init(ThemeCache::default)
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn theme(&self) -> Arc<Theme> { self.read().theme.clone() }

    /// Switch themes. Returns true when the cache was invalidated.
    pub fn set_theme(&self, theme: Theme) -> bool {
        let mut state = self.write();
        if *state.theme == theme {
            return false;
        }
        tracing::debug!(from = %state.theme.key, to = %theme.key, "theme changed; clearing style cache");
        state.theme = Arc::new(theme);
        state.generation += 1;
        state.entries.clear();
        true
    }

    pub fn get_or_insert_with<T, F>(&self, name: &'static str, generate: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce(&Theme) -> T,
    {
        let (theme, generation) = {
            let state = self.read();
            if let Some(hit) = state.entries.get(name).and_then(|e| e.clone().downcast::<T>().ok()) {
                return hit;
            }
            (state.theme.clone(), state.generation)
        };

        let value = Arc::new(generate(&theme));

        let mut state = self.write();
        if state.generation != generation {
            // Theme switched mid-generation; don't poison the new theme's cache.
            return value;
        }
        if let Some(existing) = state.entries.get(name).and_then(|e| e.clone().downcast::<T>().ok()) {
            return existing;
        }
        state.entries.insert(name, value.clone());
        value
    }

    pub fn clear(&self) { self.write().entries.clear(); }

    pub fn len(&self) -> usize { self.read().entries.len() }

    pub fn is_empty(&self) -> bool { self.read().entries.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn generator_runs_once_per_theme() {
        let cache = ThemeCache::default();
        let calls = AtomicUsize::new(0);
        let generate = |t: &Theme| { calls.fetch_add(1, Ordering::SeqCst); t.key.clone() };

        let a = cache.get_or_insert_with("key", generate);
        let b = cache.get_or_insert_with("key", generate);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(cache.set_theme(Theme::new("dark", json!({}))));
        let c = cache.get_or_insert_with("key", generate);
        assert_eq!(*c, "dark");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn setting_an_equal_theme_keeps_entries() {
        let cache = ThemeCache::default();
        cache.get_or_insert_with("n", |_| 1u32);
        assert!(!cache.set_theme(Theme::default()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn nested_generators_do_not_deadlock() {
        let cache = ThemeCache::default();
        let outer = cache.get_or_insert_with("outer", |_| {
            let inner = cache.get_or_insert_with("inner", |_| 20u32);
            *inner + 1
        });
        assert_eq!(*outer, 21);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn value_generated_across_a_theme_switch_is_not_stored() {
        let cache = ThemeCache::default();
        let v = cache.get_or_insert_with("k", |_| {
            cache.set_theme(Theme::new("other", json!({})));
            5u8
        });
        assert_eq!(*v, 5);
        assert!(cache.is_empty());
    }

    #[test]
    fn overrides_lookup() {
        let theme = Theme::new("t", json!({"button": {"primary": {"name": "x"}}}));
        assert_eq!(theme.overrides("button", "primary"), Some(&json!({"name": "x"})));
        assert_eq!(theme.overrides("button", "compact"), None);
        assert!(Theme::new("t", json!([1, 2])).variables.is_empty());
    }
}
