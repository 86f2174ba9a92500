//! Shared application state

use crate::routes::RouteResolver;
use lexlink_core::section::default_sections;
use lexlink_core::{LabelSelector, PrefixRegistry, SectionDescriptor};
use lexlink_storage::{LabelCache, TripleStore};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Static assets referenced by the document representation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

/// Deployment settings that shape responses
#[derive(Debug, Clone)]
pub struct Settings {
    /// `Cache-Control` max-age for resources, in seconds
    pub entity_max_age: u64,
    /// `Cache-Control` max-age for schema downloads, in seconds
    pub schema_max_age: u64,
    pub external_path: String,
    pub schema_path: String,
    /// Directory that relative schema file paths are resolved against
    pub schema_dir: PathBuf,
    pub assets: Assets,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entity_max_age: 86_400,
            schema_max_age: 31_536_000,
            external_path: "/dannet/external".to_string(),
            schema_path: "/schema".to_string(),
            schema_dir: PathBuf::from("."),
            assets: Assets::default(),
        }
    }
}

/// A store and the label cache filled from it
///
/// Requests hold a view for their whole lifetime; replacing the store swaps in
/// a fresh view, so late writes from old requests land in a dropped cache.
#[derive(Clone)]
pub struct StoreView {
    pub store: Arc<dyn TripleStore>,
    pub labels: Arc<LabelCache>,
}

impl StoreView {
    fn new(store: Arc<dyn TripleStore>) -> Self {
        Self {
            store,
            labels: Arc::new(LabelCache::new()),
        }
    }
}

/// State shared by every request
pub struct AppState {
    current: RwLock<StoreView>,
    pub registry: PrefixRegistry,
    pub routes: RouteResolver,
    pub selector: LabelSelector,
    pub sections: Vec<SectionDescriptor>,
    pub settings: Settings,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TripleStore>,
        registry: PrefixRegistry,
        languages: Vec<String>,
        settings: Settings,
    ) -> Self {
        let routes = RouteResolver::new(&registry, &settings.external_path, &settings.schema_path);
        Self {
            current: RwLock::new(StoreView::new(store)),
            registry,
            routes,
            selector: LabelSelector::new(languages),
            sections: default_sections(),
            settings,
        }
    }

    /// Current store with its label cache
    pub fn view(&self) -> StoreView {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn store(&self) -> Arc<dyn TripleStore> {
        self.view().store
    }

    /// Swap the store; the old label cache goes with the old store
    pub fn replace_store(&self, store: Arc<dyn TripleStore>) {
        let mut current = self.current.write().unwrap_or_else(|e| e.into_inner());
        *current = StoreView::new(store);
        self.selector.clear();
        tracing::info!("Store replaced with {} backend; caches flushed", current.store.name());
    }
}
