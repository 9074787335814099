//! Label translations.
//!
//! A label atom whose data equals its own id carries no text of its own:
//! the display value is looked up under `{component id}.label` in the
//! bundle of the sitemap, falling back from the full locale (`de_CH`) to
//! the language (`de`) to the default bundle.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("Failed to read translations '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translations '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Source of translated label text.
pub trait TranslationProvider: Send + Sync {
    /// Text for a component, or `default_text` when no bundle has it.
    ///
    /// `{0}`, `{1}`, ... in the text are replaced by `args`.
    fn get_text(
        &self,
        sitemap_id: &str,
        component_id: &str,
        default_text: &str,
        locale: Option<&str>,
        args: &[String],
    ) -> String;
}

/// Provider that never translates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTranslations;

impl TranslationProvider for NoTranslations {
    fn get_text(
        &self,
        _sitemap_id: &str,
        _component_id: &str,
        default_text: &str,
        _locale: Option<&str>,
        args: &[String],
    ) -> String {
        substitute(default_text, args)
    }
}

type Bundle = HashMap<String, String>;

/// Translations held in memory, one bundle per sitemap and locale.
#[derive(Debug, Default)]
pub struct BundleTranslationProvider {
    bundles: RwLock<HashMap<(String, String), Bundle>>,
}

impl BundleTranslationProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a bundle. `None` is the default bundle.
    pub fn add_bundle(&self, sitemap_id: &str, locale: Option<&str>, entries: Bundle) {
        self.bundles.write().insert(
            (sitemap_id.to_string(), locale.unwrap_or_default().to_string()),
            entries,
        );
    }

    /// Load every `<sitemap>[_<locale>].toml` file in `dir`.
    ///
    /// Nested tables flatten to dotted keys, so `[kitchen] label = "Küche"`
    /// defines `kitchen.label`. Returns the number of bundles loaded.
    pub fn load_dir(&self, dir: &Path) -> Result<usize, TranslationError> {
        let read_error = |source| TranslationError::ReadError {
            path: dir.to_path_buf(),
            source,
        };

        let mut loaded = 0;
        for entry in fs::read_dir(dir).map_err(read_error)? {
            let path = entry.map_err(read_error)?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("toml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let (sitemap_id, locale) = match stem.split_once('_') {
                Some((sitemap_id, locale)) => (sitemap_id, Some(locale)),
                None => (stem, None),
            };

            let content = fs::read_to_string(&path).map_err(|e| TranslationError::ReadError {
                path: path.clone(),
                source: e,
            })?;
            let table: toml::Table =
                toml::from_str(&content).map_err(|e| TranslationError::ParseError {
                    path: path.clone(),
                    source: e,
                })?;

            let mut entries = Bundle::new();
            flatten(None, &table, &mut entries);
            tracing::debug!(
                sitemap = %sitemap_id,
                locale = locale.unwrap_or("default"),
                entries = entries.len(),
                "Loaded translations"
            );
            self.add_bundle(sitemap_id, locale, entries);
            loaded += 1;
        }
        Ok(loaded)
    }

    fn lookup(&self, sitemap_id: &str, key: &str, locale: Option<&str>) -> Option<String> {
        let bundles = self.bundles.read();
        locale_candidates(locale).into_iter().find_map(|candidate| {
            bundles
                .get(&(sitemap_id.to_string(), candidate))
                .and_then(|bundle| bundle.get(key))
                .cloned()
        })
    }
}

impl TranslationProvider for BundleTranslationProvider {
    fn get_text(
        &self,
        sitemap_id: &str,
        component_id: &str,
        default_text: &str,
        locale: Option<&str>,
        args: &[String],
    ) -> String {
        let key = format!("{}.label", component_id);
        let text = self
            .lookup(sitemap_id, &key, locale)
            .unwrap_or_else(|| default_text.to_string());
        substitute(&text, args)
    }
}

/// `de_CH` -> [`de_CH`, `de`, ``].
fn locale_candidates(locale: Option<&str>) -> Vec<String> {
    let mut candidates = Vec::with_capacity(3);
    if let Some(locale) = locale.filter(|l| !l.is_empty()) {
        candidates.push(locale.to_string());
        if let Some((language, _)) = locale.split_once('_') {
            candidates.push(language.to_string());
        }
    }
    candidates.push(String::new());
    candidates
}

fn flatten(prefix: Option<&str>, table: &toml::Table, out: &mut Bundle) {
    for (key, value) in table {
        let key = match prefix {
            Some(prefix) => format!("{}.{}", prefix, key),
            None => key.clone(),
        };
        match value {
            toml::Value::Table(nested) => flatten(Some(&key), nested, out),
            toml::Value::String(text) => {
                out.insert(key, text.clone());
            }
            other => {
                out.insert(key, other.to_string());
            }
        }
    }
}

/// Replace `{n}` placeholders with the matching argument.
fn substitute(text: &str, args: &[String]) -> String {
    if args.is_empty() {
        return text.to_string();
    }
    let mut out = text.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{}}}", i), arg);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(entries: &[(&str, &str)]) -> Bundle {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn locale_falls_back_to_language_then_default() {
        let provider = BundleTranslationProvider::new();
        provider.add_bundle("home", None, bundle(&[("kitchen.label", "Kitchen"), ("hall.label", "Hall")]));
        provider.add_bundle("home", Some("de"), bundle(&[("kitchen.label", "Küche")]));

        assert_eq!(
            provider.get_text("home", "kitchen", "kitchen", Some("de_CH"), &[]),
            "Küche"
        );
        assert_eq!(
            provider.get_text("home", "hall", "hall", Some("de_CH"), &[]),
            "Hall"
        );
        assert_eq!(
            provider.get_text("home", "garage", "garage", Some("de"), &[]),
            "garage"
        );
        assert_eq!(
            provider.get_text("other", "kitchen", "kitchen", None, &[]),
            "kitchen"
        );
    }

    #[test]
    fn arguments_are_substituted() {
        let provider = BundleTranslationProvider::new();
        provider.add_bundle("home", None, bundle(&[("temp.label", "{0} is {1}")]));
        let text = provider.get_text(
            "home",
            "temp",
            "temp",
            None,
            &["Kitchen".to_string(), "warm".to_string()],
        );
        assert_eq!(text, "Kitchen is warm");
    }

    #[test]
    fn load_dir_reads_locale_from_file_name() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("home.toml"), "[kitchen]\nlabel = \"Kitchen\"\n").unwrap();
        fs::write(dir.path().join("home_de.toml"), "\"kitchen.label\" = \"Küche\"\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let provider = BundleTranslationProvider::new();
        assert_eq!(provider.load_dir(dir.path()).unwrap(), 2);
        assert_eq!(
            provider.get_text("home", "kitchen", "kitchen", Some("de"), &[]),
            "Küche"
        );
        assert_eq!(
            provider.get_text("home", "kitchen", "kitchen", Some("fr"), &[]),
            "Kitchen"
        );
    }
}
