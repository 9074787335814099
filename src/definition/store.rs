use std::fs;
use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;

use super::model::SitemapDefinition;
use super::{DefinitionError, SitemapDefinitionProvider, FILE_EXTENSION};
use crate::driver::{ModelChange, ModelChangeListener};

/// In-memory definition repository.
///
/// Every put or remove is announced to the registered
/// [`ModelChangeListener`]s under the file name of the definition.
#[derive(Default)]
pub struct DefinitionStore {
    definitions: DashMap<String, Arc<SitemapDefinition>>,
    listeners: RwLock<Vec<Arc<dyn ModelChangeListener>>>,
}

impl DefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&self, listener: Arc<dyn ModelChangeListener>) {
        self.listeners.write().push(listener);
    }

    /// Store a definition under its name, replacing any previous one.
    pub fn put(&self, definition: SitemapDefinition) {
        let name = definition.name.clone();
        let change = match self.definitions.insert(name.clone(), Arc::new(definition)) {
            Some(_) => ModelChange::Modified,
            None => ModelChange::Added,
        };
        self.notify(&name, change);
    }

    pub fn remove(&self, name: &str) -> Option<Arc<SitemapDefinition>> {
        let removed = self.definitions.remove(name).map(|(_, d)| d);
        if removed.is_some() {
            self.notify(name, ModelChange::Removed);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Load a single `.sitemap` file, named after its file stem.
    pub fn load_file(&self, path: &Path) -> Result<String, DefinitionError> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| DefinitionError::InvalidFileName {
                path: path.to_path_buf(),
            })?
            .to_string();

        let content = fs::read_to_string(path).map_err(|e| DefinitionError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let definition =
            SitemapDefinition::parse(&name, &content).map_err(|e| DefinitionError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;

        self.put(definition);
        Ok(name)
    }

    /// Load every `.sitemap` file in `dir`. Returns how many were loaded.
    pub fn load_dir(&self, dir: &Path) -> Result<usize, DefinitionError> {
        let entries = fs::read_dir(dir).map_err(|e| DefinitionError::ReadError {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut loaded = 0;
        for entry in entries {
            let path = entry
                .map_err(|e| DefinitionError::ReadError {
                    path: dir.to_path_buf(),
                    source: e,
                })?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let name = self.load_file(&path)?;
            tracing::debug!(sitemap = %name, path = %path.display(), "Sitemap definition loaded");
            loaded += 1;
        }
        Ok(loaded)
    }

    fn notify(&self, name: &str, change: ModelChange) {
        let file_name = format!("{}.{}", name, FILE_EXTENSION);
        let listeners = self.listeners.read().clone();
        for listener in listeners {
            listener.model_changed(&file_name, change);
        }
    }
}

impl SitemapDefinitionProvider for DefinitionStore {
    fn get_definition(&self, name: &str) -> Option<Arc<SitemapDefinition>> {
        self.definitions.get(name).map(|entry| entry.value().clone())
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.definitions.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        changes: Mutex<Vec<(String, ModelChange)>>,
    }

    impl ModelChangeListener for Recorder {
        fn model_changed(&self, model_name: &str, change: ModelChange) {
            self.changes.lock().push((model_name.to_string(), change));
        }
    }

    fn definition(name: &str) -> SitemapDefinition {
        SitemapDefinition {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn put_and_remove_notify_listeners() {
        let store = DefinitionStore::new();
        let recorder = Arc::new(Recorder::default());
        store.add_listener(recorder.clone());

        store.put(definition("kitchen"));
        store.put(definition("kitchen"));
        assert!(store.remove("kitchen").is_some());
        assert!(store.remove("kitchen").is_none());

        assert_eq!(
            *recorder.changes.lock(),
            vec![
                ("kitchen.sitemap".to_string(), ModelChange::Added),
                ("kitchen.sitemap".to_string(), ModelChange::Modified),
                ("kitchen.sitemap".to_string(), ModelChange::Removed),
            ]
        );
    }

    #[test]
    fn load_dir_reads_sitemap_files_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kitchen.sitemap"), "label = \"Kitchen\"\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a sitemap").unwrap();

        let store = DefinitionStore::new();
        assert_eq!(store.load_dir(dir.path()).unwrap(), 1);
        let kitchen = store.get_definition("kitchen").unwrap();
        assert_eq!(kitchen.name, "kitchen");
        assert_eq!(kitchen.label.as_deref(), Some("Kitchen"));
        assert_eq!(store.names(), vec!["kitchen".to_string()]);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.sitemap");
        fs::write(&path, "label = ").unwrap();

        let err = DefinitionStore::new().load_file(&path).unwrap_err();
        assert!(matches!(err, DefinitionError::ParseError { .. }));
        assert!(err.to_string().contains("broken.sitemap"));
    }
}
