//! Load/save backends for [`Legacy`]

use super::Legacy;
use crate::error::{LifeRestartError, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Version number for the legacy file format (increment when format changes)
const LEGACY_VERSION: u32 = 1;

/// Persistence of the cross-run state
pub trait LegacyStore {
    fn load(&self) -> Result<Legacy>;
    fn save(&self, legacy: &Legacy) -> Result<()>;
}

#[derive(Serialize, Deserialize)]
struct LegacyFile {
    version: u32,
    legacy: Legacy,
}

/// Pretty JSON file, written atomically through a sibling temp file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "legacy".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl LegacyStore for JsonFileStore {
    /// A missing file is a fresh legacy
    fn load(&self) -> Result<Legacy> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No legacy at {}, starting fresh", self.path.display());
                return Ok(Legacy::default());
            }
            Err(e) => return Err(e.into()),
        };

        let file: LegacyFile = serde_json::from_str(&text).map_err(|e| {
            LifeRestartError::Persistence(format!("{}: {}", self.path.display(), e))
        })?;
        if file.version != LEGACY_VERSION {
            return Err(LifeRestartError::Persistence(format!(
                "legacy version mismatch: expected {}, found {}",
                LEGACY_VERSION, file.version
            )));
        }
        Ok(file.legacy)
    }

    fn save(&self, legacy: &Legacy) -> Result<()> {
        let file = LegacyFile {
            version: LEGACY_VERSION,
            legacy: legacy.clone(),
        };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| LifeRestartError::Persistence(e.to_string()))?;

        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        tracing::debug!("Saved legacy to {} (times = {})", self.path.display(), legacy.times);
        Ok(())
    }
}

/// In-memory store for tests and embedders that persist elsewhere
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Legacy>,
}

impl MemoryStore {
    pub fn new(legacy: Legacy) -> Self {
        Self {
            inner: Mutex::new(legacy),
        }
    }
}

impl LegacyStore for MemoryStore {
    fn load(&self) -> Result<Legacy> {
        Ok(self.inner.lock().clone())
    }

    fn save(&self, legacy: &Legacy) -> Result<()> {
        *self.inner.lock() = legacy.clone();
        Ok(())
    }
}
