//! JSON persistence for progress and settings
//!
//! Native builds write files under the user's config directory
//! (`$XDG_CONFIG_HOME/graffiti-wash` or `~/.config/graffiti-wash`); the web
//! build uses LocalStorage with the file stem as key.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage is not available")]
    Unavailable,
    #[error("browser storage error: {0}")]
    Web(String),
}

const APP_DIR: &str = "graffiti-wash";

/// Default location for a stored document
#[cfg(not(target_arch = "wasm32"))]
pub fn default_location(key: &str) -> PathBuf {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".config"))
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    base.join(APP_DIR).join(format!("{key}.json"))
}

/// Read a document; `Ok(None)` when nothing was stored yet
#[cfg(not(target_arch = "wasm32"))]
pub fn read_json<T: DeserializeOwned>(location: &Path) -> Result<Option<T>, StorageError> {
    let json = match std::fs::read_to_string(location) {
        Ok(json) => json,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&json)?))
}

/// Write a document via a temp file so a crash never leaves half a save
#[cfg(not(target_arch = "wasm32"))]
pub fn write_json<T: Serialize>(location: &Path, value: &T) -> Result<(), StorageError> {
    if let Some(parent) = location.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(value)?;
    let tmp = location.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, location)?;
    Ok(())
}

#[cfg(target_arch = "wasm32")]
pub fn default_location(key: &str) -> PathBuf {
    PathBuf::from(format!("{APP_DIR}/{key}"))
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(StorageError::Unavailable)
}

#[cfg(target_arch = "wasm32")]
pub fn read_json<T: DeserializeOwned>(location: &Path) -> Result<Option<T>, StorageError> {
    let key = location.to_string_lossy();
    let item = local_storage()?
        .get_item(&key)
        .map_err(|e| StorageError::Web(format!("{e:?}")))?;
    match item {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn write_json<T: Serialize>(location: &Path, value: &T) -> Result<(), StorageError> {
    let key = location.to_string_lossy();
    let json = serde_json::to_string(value)?;
    local_storage()?
        .set_item(&key, &json)
        .map_err(|e| StorageError::Web(format!("{e:?}")))
}
