//! Document-style JSON persistence for the CLI.
//!
//! The catalog and ledger are stored as two pretty-printed JSON
//! documents under the data directory. Missing files read as empty
//! state; the seed catalog is the caller's decision.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{CoreError, StoreError};
use crate::habit::Catalog;
use crate::ledger::Ledger;

const CATALOG_FILE: &str = "habits.json";
const LEDGER_FILE: &str = "ledger.json";

/// File-backed habit/ledger store.
pub struct JsonStore {
    dir: PathBuf,
}

impl JsonStore {
    /// Open the store in the default data directory.
    pub fn open() -> Result<Self, CoreError> {
        let dir = super::data_dir().map_err(|e| CoreError::Custom(e.to_string()))?;
        Ok(Self { dir })
    }

    /// Open the store in an explicit directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(CATALOG_FILE)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.dir.join(LEDGER_FILE)
    }

    fn load_document<T: DeserializeOwned + Default>(&self, path: &Path) -> Result<T, CoreError> {
        if !path.exists() {
            return Ok(T::default());
        }
        let text = std::fs::read_to_string(path).map_err(|e| StoreError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| {
            StoreError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn save_document<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), CoreError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StoreError::SaveFailed {
            path: self.dir.clone(),
            message: e.to_string(),
        })?;
        let text = serde_json::to_string_pretty(value)?;
        std::fs::write(path, text).map_err(|e| {
            StoreError::SaveFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()
        })
    }

    pub fn load_catalog(&self) -> Result<Catalog, CoreError> {
        self.load_document(&self.catalog_path())
    }

    pub fn save_catalog(&self, catalog: &Catalog) -> Result<(), CoreError> {
        self.save_document(&self.catalog_path(), catalog)
    }

    pub fn load_ledger(&self) -> Result<Ledger, CoreError> {
        self.load_document(&self.ledger_path())
    }

    pub fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError> {
        self.save_document(&self.ledger_path(), ledger)
    }
}
