//! Snapshot file I/O.
//!
//! The backing file holds one JSON document shaped
//! `{ "<collection>": [record, ...] }`. Writes go to a uniquely named
//! sibling temp file that is synced and then renamed over the target, so
//! the target is either the previous document or the new one in full.
//! A file that exists but cannot be decoded is moved aside, never
//! overwritten.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::error::{StoreError, StoreResult};

/// Read and parse the snapshot at `path`.
///
/// Returns `Ok(None)` when the file is absent, unreadable or not a valid
/// snapshot; the caller starts from an empty database in that case. An
/// undecodable file is first renamed to `<name>.corrupt-<timestamp>`, and
/// failing to do so is an error so its contents are never lost.
pub async fn load_snapshot<T: DeserializeOwned>(path: &Path) -> StoreResult<Option<T>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "No database file found, starting empty");
            return Ok(None);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read database file, starting empty");
            return Ok(None);
        }
    };

    match serde_json::from_str(&content) {
        Ok(snapshot) => Ok(Some(snapshot)),
        Err(e) => {
            let backup = corrupt_path(path);
            fs::rename(path, &backup)
                .await
                .map_err(|source| StoreError::PersistenceFailed {
                    path: backup.clone(),
                    source,
                })?;
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %e,
                "Database file could not be decoded, moved aside and starting empty"
            );
            Ok(None)
        }
    }
}

/// Serialize `snapshot` and atomically replace the file at `path`.
pub async fn write_snapshot<T: Serialize>(path: &Path, snapshot: &T) -> StoreResult<()> {
    let bytes = serde_json::to_vec(snapshot)?;
    let failed = |source: std::io::Error| StoreError::PersistenceFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(failed)?;
    }

    let tmp = temp_path(path);
    let written = async {
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, path).await?;
        Ok::<_, std::io::Error>(())
    }
    .await;

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp).await;
        return Err(failed(e));
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Snapshot persisted");
    Ok(())
}

fn file_name(path: &Path) -> OsString {
    path.file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("db.json"))
}

/// `<name>.<uuid>.tmp`; unique so an abandoned write never shares a temp file.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = file_name(path);
    name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    path.with_file_name(name)
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = file_name(path);
    name.push(format!(".corrupt-{}", Utc::now().format("%Y%m%dT%H%M%S%.6f")));
    path.with_file_name(name)
}
