use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::SmokeError,
    storage::snapshot::DEFAULT_STORAGE_KEY,
    utils::paths::{app_data_dir, config_file_in, ensure_dir, tmp_path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Local storage key holding the form snapshot.
    pub storage_key: String,
    /// How long a toast stays visible.
    pub toast_duration_ms: u64,
    /// Delay before the completion notification appears.
    pub success_delay_ms: u64,
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.into(),
            toast_duration_ms: 3_000,
            success_delay_ms: 300,
            color: true,
        }
    }
}

impl Config {
    fn validate(&self) -> Result<(), SmokeError> {
        if self.storage_key.trim().is_empty() {
            return Err(SmokeError::Config("storageKey must not be empty".into()));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, SmokeError> {
        Self::from_base(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, SmokeError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, SmokeError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, SmokeError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), SmokeError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Application directory this manager was resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<(), SmokeError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
