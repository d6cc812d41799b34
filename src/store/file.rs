//! Backing file I/O
//!
//! The backing file holds exactly one pretty-printed JSON array. Reads take
//! the whole file; writes replace the whole file.
//!
//! Writes go to a sibling temporary file which is fsynced and then renamed
//! over the target, so readers observe either the old or the new collection,
//! never a torn one. The temporary file takes the target's permissions, and
//! a symlinked backing file is replaced at its link target so the link
//! survives. Ownership is not carried over.
//!
//! Every read also yields a [`Fingerprint`] (length + CRC32 of the raw bytes)
//! that writers use to detect a file changed underneath them.

use std::path::{Path, PathBuf};

use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::errors::{StoreError, StoreResult};
use super::record::{Collection, Record};

/// Identity of the exact bytes a collection was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    len: u64,
    checksum: u32,
}

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        Self {
            len: bytes.len() as u64,
            checksum: crc32fast::hash(bytes),
        }
    }
}

/// Read the raw bytes of the backing file.
async fn read_bytes(path: &Path) -> StoreResult<Vec<u8>> {
    fs::read(path).await.map_err(|e| {
        StoreError::io_failure(format!("Failed to read {}", path.display()), e)
    })
}

/// Read and parse the whole collection.
///
/// # Errors
///
/// - `IoFailure` if the file cannot be read
/// - `CorruptData` if the bytes are not a JSON array of records
pub async fn read_collection(path: &Path) -> StoreResult<(Collection, Fingerprint)> {
    let bytes = read_bytes(path).await?;
    let collection: Collection =
        serde_json::from_slice(&bytes).map_err(|e| StoreError::corrupt_data(path, e))?;
    Ok((collection, Fingerprint::of(&bytes)))
}

/// Fingerprint the current content without parsing it.
pub async fn read_fingerprint(path: &Path) -> StoreResult<Fingerprint> {
    read_bytes(path).await.map(|bytes| Fingerprint::of(&bytes))
}

/// Serialize with 2-space indentation.
pub fn encode(records: &[Record]) -> StoreResult<Vec<u8>> {
    serde_json::to_vec_pretty(records).map_err(StoreError::encode_failed)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "collection".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4().simple()))
}

/// The file a write actually replaces: the link target when `path` is a
/// symlink, otherwise `path` itself.
async fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path).await {
        Ok(meta) if meta.file_type().is_symlink() => fs::canonicalize(path)
            .await
            .unwrap_or_else(|_| path.to_path_buf()),
        _ => path.to_path_buf(),
    }
}

/// Replace the backing file with the serialized collection.
///
/// # Errors
///
/// Returns `IoFailure` if the temporary file cannot be written or synced, or
/// the rename fails. The temporary file is removed on failure.
pub async fn write_collection(path: &Path, records: &[Record]) -> StoreResult<()> {
    let bytes = encode(records)?;
    let target = resolve_target(path).await;
    let temp_path = temp_path_for(&target);

    if let Err(e) = prepare_temp(&target, &temp_path, &bytes).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e);
    }

    if let Err(e) = fs::rename(&temp_path, &target).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(StoreError::io_failure(
            format!("Failed to replace {}", target.display()),
            e,
        ));
    }

    sync_parent_dir(&target).await
}

async fn prepare_temp(target: &Path, temp_path: &Path, bytes: &[u8]) -> StoreResult<()> {
    write_synced(temp_path, bytes).await?;

    // A missing target has no permissions to keep
    if let Ok(meta) = fs::metadata(target).await {
        fs::set_permissions(temp_path, meta.permissions())
            .await
            .map_err(|e| {
                StoreError::io_failure(
                    format!("Failed to set permissions on {}", temp_path.display()),
                    e,
                )
            })?;
    }
    Ok(())
}

async fn write_synced(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut file = File::create(path).await.map_err(|e| {
        StoreError::io_failure(format!("Failed to create {}", path.display()), e)
    })?;

    file.write_all(bytes).await.map_err(|e| {
        StoreError::io_failure(format!("Failed to write {}", path.display()), e)
    })?;

    // fsync before rename
    file.sync_all()
        .await
        .map_err(|e| StoreError::io_failure(format!("fsync failed for {}", path.display()), e))
}

#[cfg(unix)]
async fn sync_parent_dir(path: &Path) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = File::open(parent).await.map_err(|e| {
        StoreError::io_failure(format!("Failed to open directory {}", parent.display()), e)
    })?;
    dir.sync_all().await.map_err(|e| {
        StoreError::io_failure(format!("fsync directory failed: {}", parent.display()), e)
    })
}

#[cfg(not(unix))]
async fn sync_parent_dir(_path: &Path) -> StoreResult<()> {
    Ok(())
}

/// Create the backing file holding an empty collection if it does not exist.
///
/// Parent directories are created as needed. Returns `true` when a new file
/// was written and `false` when one was already present.
pub async fn create_if_missing(path: &Path) -> StoreResult<bool> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(|e| {
            StoreError::io_failure(
                format!("Failed to create directory {}", parent.display()),
                e,
            )
        })?;
    }

    let opened = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await;

    let mut file = match opened {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => {
            return Err(StoreError::io_failure(
                format!("Failed to create {}", path.display()),
                e,
            ))
        }
    };

    let bytes = encode(&[])?;
    file.write_all(&bytes).await.map_err(|e| {
        StoreError::io_failure(format!("Failed to write {}", path.display()), e)
    })?;
    file.sync_all()
        .await
        .map_err(|e| StoreError::io_failure(format!("fsync failed for {}", path.display()), e))?;

    Ok(true)
}
