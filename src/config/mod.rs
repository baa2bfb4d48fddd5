//! Configuration management for `medhist`.
//!
//! Configuration is loaded from YAML files with support for:
//! - User config (~/.config/medhist/config.yaml)
//! - Workspace config (.medhist/config.yaml)
//! - An explicit `--config` path
//! - Environment variable overrides
//!
//! Later layers win field by field.

use std::path::{Path, PathBuf};

use medhist_lib::{RecordStore, SeedCondition};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MedHistError, Result};

/// Environment variable overriding `export_dir`.
pub const ENV_EXPORT_DIR: &str = "MEDHIST_EXPORT_DIR";
/// Environment variable overriding `log_file`.
pub const ENV_LOG_FILE: &str = "MEDHIST_LOG_FILE";

/// Workspace-local config path, relative to the working directory.
pub const WORKSPACE_CONFIG: &str = ".medhist/config.yaml";

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Settings that come from the command line rather than files.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Explicit config file; unlike the discovered layers it must exist.
    pub config_path: Option<PathBuf>,
}

/// Merged configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory export files are written to (default: working directory).
    pub export_dir: Option<PathBuf>,
    /// Append diagnostics to this file as well as stderr.
    pub log_file: Option<PathBuf>,
    pub log_format: Option<LogFormat>,
    /// Replaces the built-in condition list for new sessions.
    pub seed: Option<Vec<SeedCondition>>,
}

impl Config {
    /// Load and merge every configuration layer.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a present file is not valid YAML, or if the
    /// explicit `--config` file is missing.
    pub fn load(cli: &CliOverrides) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = user_config_path() {
            config.merge_file(&path, false)?;
        }
        config.merge_file(Path::new(WORKSPACE_CONFIG), false)?;
        if let Some(path) = &cli.config_path {
            config.merge_file(path, true)?;
        }

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a single YAML document.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the YAML is invalid or has unknown keys.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| MedHistError::Config(e.to_string()))
    }

    fn merge_file(&mut self, path: &Path, required: bool) -> Result<()> {
        if !path.exists() {
            if required {
                return Err(MedHistError::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            return Ok(());
        }
        let text = std::fs::read_to_string(path)?;
        let layer = Self::from_yaml(&text).map_err(|e| match e {
            MedHistError::Config(msg) => MedHistError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        debug!(path = %path.display(), "Loaded config layer");
        self.merge(layer);
        Ok(())
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(&mut self, other: Self) {
        if other.export_dir.is_some() {
            self.export_dir = other.export_dir;
        }
        if other.log_file.is_some() {
            self.log_file = other.log_file;
        }
        if other.log_format.is_some() {
            self.log_format = other.log_format;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
            self.export_dir = Some(PathBuf::from(dir));
        }
        if let Some(file) = lookup(ENV_LOG_FILE).filter(|v| !v.trim().is_empty()) {
            self.log_file = Some(PathBuf::from(file));
        }
    }

    /// Export directory, defaulting to the working directory.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[must_use]
    pub fn log_json(&self) -> bool {
        matches!(self.log_format, Some(LogFormat::Json))
    }

    /// A fresh store holding the configured seed list (or the built-in one).
    #[must_use]
    pub fn seed_store(&self) -> RecordStore {
        self.seed
            .clone()
            .map_or_else(RecordStore::seeded, RecordStore::from_seed)
    }
}

/// `$XDG_CONFIG_HOME/medhist/config.yaml`, falling back to `~/.config`.
fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("medhist").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medhist_lib::Status;
    use std::collections::HashMap;

    #[test]
    fn test_from_yaml_full() {
        let config = Config::from_yaml(
            r#"
export_dir: /tmp/exports
log_format: json
seed:
  - name: Asthma
    status: "Yes"
    since: childhood
  - name: Gout
"#,
        )
        .unwrap();

        assert_eq!(config.export_dir(), PathBuf::from("/tmp/exports"));
        assert!(config.log_json());
        let seed = config.seed.as_ref().unwrap();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].status, Status::Yes);
        assert_eq!(seed[0].since, "childhood");
        assert_eq!(seed[1].status, Status::No);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_yaml("colour: blue\n").is_err());
    }

    #[test]
    fn test_merge_later_layer_wins() {
        let mut base = Config {
            export_dir: Some(PathBuf::from("a")),
            log_file: Some(PathBuf::from("base.log")),
            ..Default::default()
        };
        base.merge(Config {
            export_dir: Some(PathBuf::from("b")),
            ..Default::default()
        });
        assert_eq!(base.export_dir(), PathBuf::from("b"));
        assert_eq!(base.log_file, Some(PathBuf::from("base.log")));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [(ENV_EXPORT_DIR, "/data/out"), (ENV_LOG_FILE, "")]
            .into_iter()
            .collect();
        let mut config = Config {
            log_file: Some(PathBuf::from("keep.log")),
            ..Default::default()
        };
        config.apply_env(|key| vars.get(key).map(|v| (*v).to_string()));

        assert_eq!(config.export_dir(), PathBuf::from("/data/out"));
        assert_eq!(config.log_file, Some(PathBuf::from("keep.log")));
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let cli = CliOverrides {
            config_path: Some(PathBuf::from("/nonexistent/medhist.yaml")),
        };
        assert!(matches!(Config::load(&cli), Err(MedHistError::Config(_))));
    }

    #[test]
    fn test_seed_store_uses_config_seed() {
        let config = Config {
            seed: Some(vec![
                SeedCondition::new("Gout", Status::Yes),
                SeedCondition::new("Anemia", Status::No),
            ]),
            ..Default::default()
        };
        let store = config.seed_store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.active_count(), 2);
        assert_eq!(store.get(2).unwrap().name, "Anemia");

        assert_eq!(Config::default().seed_store().len(), 11);
    }
}
