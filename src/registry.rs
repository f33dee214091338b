use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use crate::config::ViewerConfig;
use crate::display::DisplaySettings;
use crate::model::{Model, SelectionModel, Settings};
use crate::view::ModelView;
use crate::viewer::ViewerWindowFactory;

/// Builds live views of one kind. May be called any number of times.
pub trait ViewFactory: Send + Sync {
    fn key(&self) -> &str;

    fn create(
        &self,
        model: &Arc<Model>,
        settings: &Arc<Settings>,
        selection: &Arc<SelectionModel>,
        display_settings: &Arc<DisplaySettings>,
    ) -> Result<Arc<dyn ModelView>>;
}

/// Maps a view kind to its factory. Lookups have no side effects.
#[derive(Default, Clone)]
pub struct ViewFactoryRegistry {
    factories: HashMap<String, Arc<dyn ViewFactory>>,
}

impl ViewFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in viewer window factory.
    pub fn with_defaults(config: ViewerConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ViewerWindowFactory::new(config)));
        registry
    }

    /// Registers `factory` under its own key, returning the factory it replaced.
    pub fn register(&mut self, factory: Arc<dyn ViewFactory>) -> Option<Arc<dyn ViewFactory>> {
        let key = factory.key().to_string();
        let replaced = self.factories.insert(key.clone(), factory);
        if replaced.is_some() {
            log::debug!("[registry] replaced view factory '{key}'");
        }
        replaced
    }

    pub fn factory(&self, kind: &str) -> Option<Arc<dyn ViewFactory>> {
        self.factories.get(kind).cloned()
    }

    pub fn has(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
