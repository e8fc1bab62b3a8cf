//! Planner configuration.
//!
//! Loaded from an explicit path, `.planner.yml`, or `~/.config/planner/planner.yml`.

use crate::kv::validate_key;
use crate::store::DEFAULT_STORAGE_KEY;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name.
pub const PROJECT_CONFIG: &str = ".planner.yml";

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Directory holding the snapshot file. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    /// Key of the snapshot slot.
    pub storage_key: String,

    /// Log level: error, warn, info, debug or trace.
    pub log_level: String,

    /// File this config was read from, if any.
    #[serde(skip)]
    pub source: Option<PathBuf>,

    /// Fallback files that existed but failed to load, with the reason.
    #[serde(skip)]
    pub skipped: Vec<(PathBuf, String)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            log_level: "warn".to_string(),
            source: None,
            skipped: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .planner.yml in current directory
    /// 3. ~/.config/planner/planner.yml
    /// 4. Defaults
    ///
    /// Only an explicit path that fails to load is an error; broken fallback
    /// files are skipped and listed in `skipped`.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let mut candidates = vec![PathBuf::from(PROJECT_CONFIG)];
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join("planner").join("planner.yml"));
        }

        Ok(Self::load_first(&candidates))
    }

    /// First candidate that loads, or defaults. Candidates that exist but fail
    /// to load are recorded in `skipped`.
    pub fn load_first(candidates: &[PathBuf]) -> Self {
        let mut skipped = Vec::new();
        let mut config = Self::default();

        for candidate in candidates {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(candidate) {
                Ok(loaded) => {
                    config = loaded;
                    break;
                }
                Err(e) => skipped.push((candidate.clone(), format!("{:#}", e))),
            }
        }

        config.skipped = skipped;
        config
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let mut config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.source = Some(path.as_ref().to_path_buf());
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validate_key(&self.storage_key).context("storage-key is invalid")?;
        self.level()?;
        Ok(())
    }

    /// Parsed log level.
    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| eyre::eyre!("log-level must be one of error, warn, info, debug, trace: {}", self.log_level))
    }

    /// Resolved snapshot directory.
    pub fn data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .map(|dir| dir.join("planner"))
                .unwrap_or_else(|| PathBuf::from(".planner")),
        }
    }
}
