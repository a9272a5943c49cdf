use std::{fs, path::PathBuf};

use crate::infra::{config::LogConfig, error::AppError};

const APP_DIR_NAME: &str = "replykb";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub log_dir: PathBuf,
}

impl StorageLayout {
    /// Uses the configured log directory, else `<state dir>/replykb/logs`
    /// with the cache dir as fallback on platforms without a state dir.
    pub fn resolve(logging: &LogConfig) -> Result<Self, AppError> {
        if let Some(directory) = &logging.directory {
            return Ok(Self {
                log_dir: directory.clone(),
            });
        }

        let base = dirs::state_dir()
            .or_else(dirs::cache_dir)
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve state or cache directory".into(),
            })?;

        Ok(Self {
            log_dir: base.join(APP_DIR_NAME).join("logs"),
        })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.log_dir).map_err(|source| AppError::LogDirCreate {
            path: self.log_dir.clone(),
            source,
        })
    }
}
