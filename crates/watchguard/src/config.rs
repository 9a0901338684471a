//! Watchguard configuration management

use anyhow::{Context, Result, anyhow};
use common::ConfigFolder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Operating mode of the guard
///
/// In lockdown every command that changes the denylist is refused, so a
/// locked-down host cannot be loosened by editing the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GuardMode {
    #[default]
    Normal,
    Lockdown,
}

impl std::fmt::Display for GuardMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GuardMode::Normal => write!(f, "normal"),
            GuardMode::Lockdown => write!(f, "lockdown"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GuardConfig {
    #[serde(default)]
    pub guard: GuardSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardSettings {
    #[serde(default = "GuardSettings::default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub mode: GuardMode,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            log_level: Self::default_log_level(),
            mode: GuardMode::Normal,
        }
    }
}

impl GuardSettings {
    fn default_log_level() -> String {
        "info".to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Snapshot file location; `~` is expanded.
    /// If None, uses `denylist.bin` in the config folder
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

impl GuardConfig {
    /// Load configuration from `path`
    ///
    /// A missing or empty file yields the defaults, matching the empty
    /// `config.toml` created on first run.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        let config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let config: GuardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the specified path
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!("Saved configuration to: {}", path.display());
        Ok(())
    }

    /// Resolve where the denylist snapshot lives
    pub fn snapshot_path(&self, folder: &ConfigFolder) -> PathBuf {
        match &self.storage.snapshot_path {
            Some(p) => expand_path(p),
            None => folder.snapshot_file(),
        }
    }

    fn validate(&self) -> Result<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.guard.log_level.as_str()) {
            return Err(anyhow!(
                "Invalid log level '{}', must be one of: {}",
                self.guard.log_level,
                valid_levels.join(", ")
            ));
        }

        if let Some(path) = &self.storage.snapshot_path {
            if path.as_os_str().is_empty() {
                return Err(anyhow!("storage.snapshot_path must not be empty"));
            }
        }

        Ok(())
    }
}

/// Expand a leading `~` in a user-supplied path
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}
