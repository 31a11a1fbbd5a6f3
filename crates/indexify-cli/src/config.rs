//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use indexify_sdk::{ClientConfig, TlsConfig, DEFAULT_SERVICE_URL};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name
    #[serde(default = "default_profile")]
    pub active_profile: String,

    /// Available profiles
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Connection profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Indexify service URL
    pub service_url: String,

    /// Namespace; `default` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// TLS settings file (see [`TlsConfig`])
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls_config: Option<PathBuf>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".indexify").join("config.toml"))
    }

    /// Load configuration from the default location or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get the active profile.
    pub fn get_active_profile(&self) -> Result<&Profile> {
        self.profiles
            .get(&self.active_profile)
            .ok_or_else(|| CliError::Config(format!("Profile '{}' not found", self.active_profile)))
    }

    /// Add or update a profile.
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Switch to a different profile.
    pub fn switch_profile(&mut self, name: String) -> Result<()> {
        if !self.profiles.contains_key(&name) {
            return Err(CliError::Config(format!("Profile '{}' does not exist", name)));
        }
        self.active_profile = name;
        Ok(())
    }
}

impl Profile {
    /// Profile for `service_url` with no namespace or TLS
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            namespace: None,
            tls_config: None,
        }
    }

    /// Build the SDK configuration, applying command-line overrides.
    ///
    /// The TLS file is read here so a bad file fails before any request.
    pub fn client_config(&self, url: Option<&str>, namespace: Option<&str>) -> Result<ClientConfig> {
        let mut config = ClientConfig::new(url.unwrap_or(&self.service_url));
        if let Some(namespace) = namespace.or(self.namespace.as_deref()) {
            config = config.with_namespace(namespace);
        }
        if let Some(path) = &self.tls_config {
            config = config.with_tls(TlsConfig::from_file(path)?);
        }
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert("default".to_string(), Profile::new(DEFAULT_SERVICE_URL));

        Self {
            active_profile: "default".to_string(),
            profiles,
            settings: Settings::default(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_profile() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.active_profile, "default");
        assert_eq!(config.get_active_profile().unwrap().service_url, "http://localhost:8900");
        assert!(config.settings.color);
    }

    #[test]
    fn test_profile_management() {
        let mut config = Config::default();

        let profile = Profile {
            service_url: "https://indexify.internal:8900".to_string(),
            namespace: Some("research".to_string()),
            tls_config: None,
        };

        config.set_profile("prod".to_string(), profile);
        assert!(config.profiles.contains_key("prod"));

        config.switch_profile("prod".to_string()).unwrap();
        assert_eq!(config.active_profile, "prod");
    }

    #[test]
    fn test_switch_to_nonexistent_profile() {
        let mut config = Config::default();
        let result = config.switch_profile("nonexistent".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        let mut profile = Profile::new("http://indexify:8900");
        profile.namespace = Some("research".to_string());
        config.set_profile("research".to_string(), profile.clone());
        config.settings.format = OutputFormat::Json;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.profiles.get("research"), Some(&profile));
        assert_eq!(loaded.settings.format, OutputFormat::Json);
    }

    #[test]
    fn test_missing_file_yields_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.active_profile, "default");
    }

    #[test]
    fn test_client_config_overrides() {
        let mut profile = Profile::new("http://indexify:8900");
        profile.namespace = Some("research".to_string());

        let config = profile.client_config(None, None).unwrap();
        assert_eq!(config.service_url, "http://indexify:8900");
        assert_eq!(config.namespace, "research");

        let config = profile
            .client_config(Some("http://localhost:8900/"), Some("scratch"))
            .unwrap();
        assert_eq!(config.service_url, "http://localhost:8900");
        assert_eq!(config.namespace, "scratch");
    }

    #[test]
    fn test_client_config_reads_tls_file() {
        let dir = tempfile::tempdir().unwrap();
        let tls_path = dir.path().join("tls.toml");
        fs::write(&tls_path, "use_tls = true\ncert_path = \"/certs/client.crt\"\n").unwrap();

        let mut profile = Profile::new("https://indexify:8900");
        profile.tls_config = Some(tls_path);

        let err = profile.client_config(None, None).unwrap_err();
        assert!(matches!(err, CliError::Sdk(_)));
    }
}
