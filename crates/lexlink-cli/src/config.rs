//! CLI configuration

use std::path::{Path, PathBuf};

use anyhow::Context;
use lexlink_core::PrefixRegistry;
use lexlink_storage::BackendKind;
use lexlink_web::{Assets, Settings};
use serde::{Deserialize, Serialize};

/// Default config file location
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexlink")
        .join("config.toml")
}

/// Default directory for on-disk stores
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lexlink")
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Path for the store; on-disk backends fall back to the data directory
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match (&self.path, self.backend) {
            (Some(path), _) => Some(path.clone()),
            (None, BackendKind::Memory) => None,
            (None, kind) => Some(default_data_dir().join(format!("lexlink.{}", kind))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub entity_max_age: u64,
    pub schema_max_age: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            entity_max_age: settings.entity_max_age,
            schema_max_age: settings.schema_max_age,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    pub external_path: String,
    pub schema_path: String,
    pub schema_dir: PathBuf,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            external_path: settings.external_path,
            schema_path: settings.schema_path,
            schema_dir: settings.schema_dir,
        }
    }
}

/// Configuration for the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bind: String,
    pub languages: Vec<String>,
    /// TOML file with `[[prefix]]` entries replacing the built-in registry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefixes_file: Option<PathBuf>,
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub routes: RoutesConfig,
    pub assets: Assets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3456".to_string(),
            languages: vec!["da".to_string(), "en".to_string()],
            prefixes_file: None,
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            routes: RoutesConfig::default(),
            assets: Assets::default(),
        }
    }
}

impl Config {
    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "bind",
            "languages",
            "prefixes_file",
            "store.backend",
            "store.path",
            "cache.entity_max_age",
            "cache.schema_max_age",
            "routes.external_path",
            "routes.schema_path",
            "routes.schema_dir",
            "assets.stylesheet",
            "assets.script",
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        match key {
            "bind" => Some(self.bind.clone()),
            "languages" => Some(self.languages.join(",")),
            "prefixes_file" => path(&self.prefixes_file),
            "store.backend" => Some(self.store.backend.to_string()),
            "store.path" => path(&self.store.path),
            "cache.entity_max_age" => Some(self.cache.entity_max_age.to_string()),
            "cache.schema_max_age" => Some(self.cache.schema_max_age.to_string()),
            "routes.external_path" => Some(self.routes.external_path.clone()),
            "routes.schema_path" => Some(self.routes.schema_path.clone()),
            "routes.schema_dir" => Some(self.routes.schema_dir.display().to_string()),
            "assets.stylesheet" => self.assets.stylesheet.clone(),
            "assets.script" => self.assets.script.clone(),
            _ => None,
        }
    }

    /// Set a key from its string form; an empty value clears optional keys
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let optional = |v: &str| (!v.is_empty()).then(|| v.to_string());
        match key {
            "bind" => self.bind = value.to_string(),
            "languages" => {
                self.languages = value
                    .split(',')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            }
            "prefixes_file" => self.prefixes_file = optional(value).map(PathBuf::from),
            "store.backend" => self.store.backend = value.parse()?,
            "store.path" => self.store.path = optional(value).map(PathBuf::from),
            "cache.entity_max_age" => self.cache.entity_max_age = value.parse()?,
            "cache.schema_max_age" => self.cache.schema_max_age = value.parse()?,
            "routes.external_path" => self.routes.external_path = value.to_string(),
            "routes.schema_path" => self.routes.schema_path = value.to_string(),
            "routes.schema_dir" => self.routes.schema_dir = PathBuf::from(value),
            "assets.stylesheet" => self.assets.stylesheet = optional(value),
            "assets.script" => self.assets.script = optional(value),
            _ => anyhow::bail!(
                "Unknown config key: {}. Available keys: {}",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    /// Prefix registry from `prefixes_file`, or the built-in one
    pub fn registry(&self) -> anyhow::Result<PrefixRegistry> {
        match &self.prefixes_file {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read prefixes file {}", path.display()))?;
                Ok(PrefixRegistry::from_toml_str(&content)?)
            }
            None => Ok(PrefixRegistry::dannet()),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            entity_max_age: self.cache.entity_max_age,
            schema_max_age: self.cache.schema_max_age,
            external_path: self.routes.external_path.clone(),
            schema_path: self.routes.schema_path.clone(),
            schema_dir: self.routes.schema_dir.clone(),
            assets: self.assets.clone(),
        }
    }
}
