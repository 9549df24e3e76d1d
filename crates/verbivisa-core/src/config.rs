//! Configuration loading.
//!
//! A `VisaConfig` value is passed explicitly to every store; nothing reads
//! paths from global state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::VisaError;

/// Names of the required CSV columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNames {
    /// Column holding the Italian form.
    #[serde(default = "default_source_column")]
    pub source: String,
    /// Column holding the Finnish form.
    #[serde(default = "default_target_column")]
    pub target: String,
    /// Column holding the irregular marker.
    #[serde(default = "default_irregular_column")]
    pub irregular: String,
}

fn default_source_column() -> String {
    "italia".to_string()
}
fn default_target_column() -> String {
    "suomi".to_string()
}
fn default_irregular_column() -> String {
    "epäsäännöllinen".to_string()
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            source: default_source_column(),
            target: default_target_column(),
            irregular: default_irregular_column(),
        }
    }
}

/// Top-level verbivisa configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisaConfig {
    /// Directory holding the packet and highscore files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Default word list.
    #[serde(default = "default_words")]
    pub words: PathBuf,
    /// Words per packet.
    #[serde(default = "default_package_size")]
    pub package_size: usize,
    /// Fixed seed for packet creation. `None` draws from the thread RNG.
    #[serde(default)]
    pub packet_seed: Option<u64>,
    /// Packet file name, relative to `data_dir`.
    #[serde(default = "default_packets_file")]
    pub packets_file: String,
    /// Highscore file name, relative to `data_dir`.
    #[serde(default = "default_highscores_file")]
    pub highscores_file: String,
    /// Required CSV columns.
    #[serde(default)]
    pub columns: ColumnNames,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_words() -> PathBuf {
    PathBuf::from("verbit.csv")
}
fn default_package_size() -> usize {
    20
}
fn default_packets_file() -> String {
    "packages.json".to_string()
}
fn default_highscores_file() -> String {
    "highscores.json".to_string()
}

impl Default for VisaConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            words: default_words(),
            package_size: default_package_size(),
            packet_seed: None,
            packets_file: default_packets_file(),
            highscores_file: default_highscores_file(),
            columns: ColumnNames::default(),
        }
    }
}

impl VisaConfig {
    pub fn packets_path(&self) -> PathBuf {
        self.data_dir.join(&self.packets_file)
    }

    pub fn highscores_path(&self) -> PathBuf {
        self.data_dir.join(&self.highscores_file)
    }

    /// Reject values no command can work with.
    pub fn validate(&self) -> Result<()> {
        if self.package_size == 0 {
            return Err(VisaError::ZeroPackageSize.into());
        }
        anyhow::ensure!(
            !self.packets_file.trim().is_empty() && !self.highscores_file.trim().is_empty(),
            "packets_file and highscores_file must be non-empty"
        );
        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("VERBIVISA_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(size) = std::env::var("VERBIVISA_PACKAGE_SIZE") {
            self.package_size = size
                .trim()
                .parse()
                .with_context(|| format!("invalid VERBIVISA_PACKAGE_SIZE: '{size}'"))?;
        }
        Ok(())
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without an explicit path:
/// 1. `verbivisa.toml` in the current directory
/// 2. `~/.config/verbivisa/config.toml`
///
/// Environment variable overrides: `VERBIVISA_DATA_DIR`, `VERBIVISA_PACKAGE_SIZE`.
pub fn load_config_from(path: Option<&Path>) -> Result<VisaConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("verbivisa.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<VisaConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => VisaConfig::default(),
    };

    config.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("verbivisa"))
}
