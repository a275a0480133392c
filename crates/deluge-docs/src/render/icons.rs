//! Icon identifier to asset lookup.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::IconConfig;
use crate::error::{Error, Result};

/// Maps icon identifiers (`turn-select-left`) to asset URLs.
///
/// Loaded once and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IconRegistry {
    icons: BTreeMap<String, String>,
}

impl IconRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the configured icon directory.
    ///
    /// Every file whose extension is listed in `config.extensions` is
    /// registered under its file stem, with URL `url_prefix + file name`.
    /// A missing directory yields an empty registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn load(config: &IconConfig) -> Result<Self> {
        Self::load_dir(&config.dir, &config.url_prefix, &config.extensions)
    }

    /// Scan `dir` for icon files.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    pub fn load_dir(dir: &Path, url_prefix: &str, extensions: &[String]) -> Result<Self> {
        if !dir.exists() {
            warn!(dir = %dir.display(), "icon directory not found, no icons registered");
            return Ok(Self::new());
        }

        let io_err = |source| Error::IconDirectory {
            path: dir.to_path_buf(),
            source,
        };

        let mut registry = Self::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            let known_extension = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)));
            if !path.is_file() || !known_extension {
                continue;
            }
            let (Some(stem), Some(file_name)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.file_name().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            registry.insert(stem, format!("{url_prefix}{file_name}"));
        }

        debug!(dir = %dir.display(), icons = registry.len(), "loaded icons");
        Ok(registry)
    }

    /// Register an icon, replacing any previous asset for `id`.
    pub fn insert(&mut self, id: impl Into<String>, url: impl Into<String>) {
        self.icons.insert(id.into(), url.into());
    }

    /// Asset URL for `id`.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        self.icons.get(id).map(String::as_str)
    }

    /// Number of registered icons.
    #[must_use]
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether no icons are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for IconRegistry {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut registry = Self::new();
        for (id, url) in iter {
            registry.insert(id, url);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        vec!["svg".to_string(), "png".to_string()]
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("select.svg"), "<svg/>").unwrap();
        std::fs::write(dir.path().join("turn-select-left.PNG"), [0u8]).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(dir.path().join("nested.svg")).unwrap();

        let registry = IconRegistry::load_dir(dir.path(), "/icons/", &extensions()).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("select"), Some("/icons/select.svg"));
        assert_eq!(
            registry.get("turn-select-left"),
            Some("/icons/turn-select-left.PNG")
        );
        assert!(registry.get("notes").is_none());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let registry =
            IconRegistry::load_dir(Path::new("/nonexistent/icons"), "/", &extensions()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unreadable_dir_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("icons");
        std::fs::write(&file, "not a directory").unwrap();

        let err = IconRegistry::load_dir(&file, "/", &extensions()).unwrap_err();
        match err {
            Error::IconDirectory { path, .. } => assert_eq!(path, file),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("gold.svg"), "<svg/>").unwrap();
        let config = IconConfig {
            dir: dir.path().to_path_buf(),
            url_prefix: "/assets/".to_string(),
            extensions: vec!["svg".to_string()],
        };

        let registry = IconRegistry::load(&config).unwrap();
        assert_eq!(registry.get("gold"), Some("/assets/gold.svg"));
    }

    #[test]
    fn test_from_iter() {
        let registry: IconRegistry = [("select", "/select.svg")].into_iter().collect();
        assert_eq!(registry.get("select"), Some("/select.svg"));
    }
}
