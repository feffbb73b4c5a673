//! services/api/src/adapters/store.rs
//!
//! This module contains the profile store adapter, which is the concrete
//! implementation of the `StorageService` port from the `core` crate. Each of
//! the three records lives in its own JSON file under the profile directory
//! and is read and rewritten whole; nothing coordinates writes across files.

use async_trait::async_trait;
use promail_core::domain::{UsageLogEntry, User, VisitLogEntry};
use promail_core::ports::{PortError, PortResult, StorageService};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::warn;

const USER_FILE: &str = "user.json";
const USAGE_FILE: &str = "usage_log.json";
const VISIT_FILE: &str = "visit_log.json";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A file-backed adapter that implements the `StorageService` port.
#[derive(Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates a new `JsonFileStore` rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ensures the profile directory exists. Called once at startup.
    pub async fn init(&self) -> PortResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Reads a record file, returning `None` when it does not exist yet.
    async fn read_record(path: &Path) -> PortResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    async fn write_record<T: Serialize>(path: &Path, value: &T) -> PortResult<()> {
        let json =
            serde_json::to_string(value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }

    /// Loads a log file leniently: rows that fail to deserialize (malformed,
    /// or written by a future version with unknown enum values) are skipped,
    /// and an unparseable file is treated as empty.
    async fn read_log<T: DeserializeOwned>(path: &Path) -> PortResult<Vec<T>> {
        let Some(text) = Self::read_record(path).await? else {
            return Ok(Vec::new());
        };

        let rows: Vec<serde_json::Value> = match serde_json::from_str(&text) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Discarding unparseable log file {}: {e}", path.display());
                return Ok(Vec::new());
            }
        };

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match serde_json::from_value::<T>(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping unrecognized log entry in {}: {e}", path.display()),
            }
        }
        Ok(entries)
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for JsonFileStore {
    async fn load_user(&self) -> PortResult<Option<User>> {
        let Some(text) = Self::read_record(&self.path(USER_FILE)).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&text) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                // Unparseable state is treated as absent rather than fatal.
                warn!("Discarding malformed user record: {e}");
                Ok(None)
            }
        }
    }

    async fn save_user(&self, user: &User) -> PortResult<()> {
        Self::write_record(&self.path(USER_FILE), user).await
    }

    async fn clear_user(&self) -> PortResult<()> {
        match tokio::fs::remove_file(self.path(USER_FILE)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(e.to_string())),
        }
    }

    async fn load_usage_log(&self) -> PortResult<Vec<UsageLogEntry>> {
        Self::read_log(&self.path(USAGE_FILE)).await
    }

    async fn store_usage_log(&self, entries: &[UsageLogEntry]) -> PortResult<()> {
        Self::write_record(&self.path(USAGE_FILE), &entries).await
    }

    async fn load_visit_log(&self) -> PortResult<Vec<VisitLogEntry>> {
        Self::read_log(&self.path(VISIT_FILE)).await
    }

    async fn store_visit_log(&self, entries: &[VisitLogEntry]) -> PortResult<()> {
        Self::write_record(&self.path(VISIT_FILE), &entries).await
    }
}
