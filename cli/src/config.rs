//! CLI configuration with TOML file support.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tipy_types::Rent;
use tipy_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings for the local bank the CLI drives.
///
/// Loaded from TOML with [`TipyConfig::from_toml_file`]; any key left out
/// falls back to its default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipyConfig {
    /// Directory of the LMDB account store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in MiB.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub rent: RentConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentConfig {
    #[serde(default = "default_lamports_per_byte")]
    pub lamports_per_byte: u64,
    #[serde(default = "default_account_overhead")]
    pub account_overhead: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./tipy_data")
}

fn default_map_size_mb() -> usize {
    256
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_lamports_per_byte() -> u64 {
    Rent::DEFAULT_LAMPORTS_PER_BYTE
}

fn default_account_overhead() -> u64 {
    Rent::DEFAULT_ACCOUNT_OVERHEAD
}

impl TipyConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// LMDB map size in bytes.
    pub fn map_size_bytes(&self) -> usize {
        self.map_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for TipyConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            rent: RentConfig::default(),
        }
    }
}

impl Default for RentConfig {
    fn default() -> Self {
        Self {
            lamports_per_byte: default_lamports_per_byte(),
            account_overhead: default_account_overhead(),
        }
    }
}

impl From<RentConfig> for Rent {
    fn from(config: RentConfig) -> Self {
        Rent {
            lamports_per_byte: config.lamports_per_byte,
            account_overhead: config.account_overhead,
        }
    }
}
