//! Application configuration and the model library manifest
//!
//! [`AppConfig`] is persisted as RON. The model library can additionally be
//! read from a JSON manifest listing `{ id, name, path }` entries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use tape_core::MeasureConfig;
use tape_renderer::RendererConfig;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "TAPE_CONFIG";

/// Default config file name, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tape.ron";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// A model the user can load from the library panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryEntry {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

/// Ordered list of library entries
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ModelLibrary {
    entries: Vec<LibraryEntry>,
}

impl ModelLibrary {
    pub fn new(entries: Vec<LibraryEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON manifest (`[{ "id": .., "name": .., "path": .. }, ..]`).
    ///
    /// Relative paths are resolved against `base_dir`.
    pub fn from_json(json: &str, base_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let mut library: ModelLibrary =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(base) = base_dir {
            for entry in &mut library.entries {
                if entry.path.is_relative() {
                    entry.path = base.join(&entry.path);
                }
            }
        }
        Ok(library)
    }

    /// Read a JSON manifest from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json(&json, path.parent())
    }

    pub fn get(&self, id: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    /// Add entries whose id is not present yet. Returns how many were added.
    pub fn merge(&mut self, other: ModelLibrary) -> usize {
        let mut added = 0;
        for entry in other.entries {
            if self.get(&entry.id).is_none() {
                self.entries.push(entry);
                added += 1;
            }
        }
        added
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub measure: MeasureConfig,
    #[serde(default)]
    pub library: ModelLibrary,
}

impl AppConfig {
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        ron::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

/// Owns the live configuration and where it is stored
#[derive(Debug)]
pub struct ConfigManager {
    config: AppConfig,
    /// `None` when there is no file system (web build)
    path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load from the default location, falling back to defaults
    pub fn new() -> Self {
        match Self::default_path() {
            Some(path) => Self::load_or_default(path),
            None => Self::in_memory(AppConfig::default()),
        }
    }

    /// A manager that never touches the file system
    pub fn in_memory(config: AppConfig) -> Self {
        Self { config, path: None }
    }

    /// Config file location: `TAPE_CONFIG` if set, else `tape.ron`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> Option<PathBuf> {
        Some(
            std::env::var_os(CONFIG_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
        )
    }

    #[cfg(target_arch = "wasm32")]
    pub fn default_path() -> Option<PathBuf> {
        None
    }

    /// Load `path`, or use defaults if it is missing or unreadable
    pub fn load_or_default(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = if path.exists() {
            match Self::read(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to load config {}: {}", path.display(), e);
                    AppConfig::default()
                }
            }
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            AppConfig::default()
        };
        Self {
            config,
            path: Some(path),
        }
    }

    fn read(path: &Path) -> Result<AppConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        AppConfig::from_ron(&content)
    }

    /// Write the current configuration. A no-op without a backing file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let Some(path) = &self.path else {
            tracing::debug!("Config has no backing file, not saving");
            return Ok(());
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }
        let content = self.config.to_ron()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn reset_to_defaults(&mut self) {
        self.config = AppConfig::default();
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration shared between the app and its panels
pub type SharedConfig = Arc<RwLock<ConfigManager>>;

pub fn create_shared_config() -> SharedConfig {
    Arc::new(RwLock::new(ConfigManager::new()))
}

#[cfg(test)]
mod tests {
    use tape_core::{LengthUnit, SwapPolicy};

    use super::*;

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tape.ron");

        let mut manager = ConfigManager::load_or_default(&path);
        assert_eq!(manager.config(), &AppConfig::default());

        manager.config_mut().measure.swap_policy = SwapPolicy::Clear;
        manager.config_mut().measure.unit = LengthUnit::Millimeters;
        manager.config_mut().renderer.lighting.multiplier = 1.5;
        manager.save().unwrap();

        let reloaded = ConfigManager::load_or_default(&path);
        assert_eq!(reloaded.config().measure.swap_policy, SwapPolicy::Clear);
        assert_eq!(reloaded.config().measure.unit, LengthUnit::Millimeters);
        assert_eq!(reloaded.config().renderer.lighting.multiplier, 1.5);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tape.ron");
        std::fs::write(&path, "not ( valid ron").unwrap();

        let manager = ConfigManager::load_or_default(&path);
        assert_eq!(manager.config(), &AppConfig::default());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = AppConfig::from_ron("(measure: (decimals: 2))").unwrap();
        assert_eq!(config.measure.decimals, 2);
        assert_eq!(config.measure.swap_policy, SwapPolicy::Preserve);
        assert_eq!(config.renderer, RendererConfig::default());
    }

    #[test]
    fn test_reset_to_defaults() {
        let mut manager = ConfigManager::in_memory(AppConfig::default());
        manager.config_mut().measure.decimals = 3;
        manager.reset_to_defaults();
        assert_eq!(manager.config().measure.decimals, 1);
        assert!(manager.save().is_ok());
    }

    #[test]
    fn test_library_manifest() {
        let json = r#"[
            { "id": "chair", "name": "Chair", "path": "models/chair.obj" },
            { "id": "lamp", "name": "Lamp", "path": "/abs/lamp.stl" }
        ]"#;
        let library = ModelLibrary::from_json(json, Some(Path::new("/data"))).unwrap();

        assert_eq!(library.len(), 2);
        assert_eq!(
            library.get("chair").unwrap().path,
            PathBuf::from("/data/models/chair.obj")
        );
        assert_eq!(library.get("lamp").unwrap().path, PathBuf::from("/abs/lamp.stl"));
        assert!(library.get("sofa").is_none());
    }

    #[test]
    fn test_library_manifest_errors() {
        assert!(matches!(
            ModelLibrary::from_json("{", None),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ModelLibrary::load("/nonexistent/library.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_library_merge_skips_known_ids() {
        let entry = |id: &str| LibraryEntry {
            id: id.to_string(),
            name: id.to_uppercase(),
            path: PathBuf::from(format!("{id}.stl")),
        };
        let mut library = ModelLibrary::new(vec![entry("a")]);
        let added = library.merge(ModelLibrary::new(vec![entry("a"), entry("b")]));
        assert_eq!(added, 1);
        assert_eq!(library.len(), 2);
    }
}
