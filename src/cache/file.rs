use std::fs::{self, File};
use std::io::{BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::app::{NotFoundReason, Result, ThreadreelError};
use crate::domain::Expiring;

pub const CACHE_FILE_EXTENSION: &str = "json";

/// Percent-encoded key plus the cache extension.
pub(crate) fn file_name(key: &str) -> String {
    format!("{}.{}", urlencoding::encode(key), CACHE_FILE_EXTENSION)
}

pub(crate) fn read_entry<T>(path: &Path, now: DateTime<Utc>) -> Result<T>
where
    T: DeserializeOwned + Expiring,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("Cache miss: {}", path.display());
            return Err(ThreadreelError::NotFound(NotFoundReason::NotCached));
        }
        Err(e) => {
            tracing::warn!("Could not open cache file {}: {}", path.display(), e);
            return Err(ThreadreelError::CannotOpenCacheFile(e));
        }
    };

    let entry: T = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
        tracing::warn!("Could not decode cache file {}: {}", path.display(), e);
        ThreadreelError::CannotDecodeCacheFile(e)
    })?;

    if !entry.is_fresh_at(now) {
        return Err(ThreadreelError::CacheEntryExpired);
    }

    Ok(entry)
}

pub(crate) fn write_entry<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            tracing::warn!("Could not create cache directory {}: {}", parent.display(), e);
            ThreadreelError::CannotOpenCacheFile(e)
        })?;
    }

    let json = serde_json::to_vec_pretty(value).map_err(|e| {
        tracing::warn!("Could not encode cache entry: {}", e);
        ThreadreelError::CannotEncodeCacheFile(e.to_string())
    })?;

    let mut file = File::create(path).map_err(|e| {
        tracing::warn!("Could not open cache file {} for writing: {}", path.display(), e);
        ThreadreelError::CannotOpenCacheFile(e)
    })?;

    write_or_discard(&mut file, path, &json)
}

/// Write `bytes` to the file just created at `path`, removing the partial
/// file if the write fails.
fn write_or_discard<W: Write>(writer: &mut W, path: &Path, bytes: &[u8]) -> Result<()> {
    if let Err(e) = writer.write_all(bytes) {
        tracing::warn!("Could not write cache file {}: {}", path.display(), e);
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::debug!("Could not remove partial cache file {}: {}", path.display(), remove_err);
        }
        return Err(ThreadreelError::Io(e));
    }
    Ok(())
}

fn is_cache_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == CACHE_FILE_EXTENSION)
}

/// Delete `path` if it decodes and is expired. Undecodable files are left
/// alone.
fn remove_if_expired<T>(path: &Path, now: DateTime<Utc>)
where
    T: DeserializeOwned + Expiring,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("Could not open cache file {}: {}", path.display(), e);
            return;
        }
    };

    let entry: T = match serde_json::from_reader(BufReader::new(file)) {
        Ok(entry) => entry,
        Err(e) => {
            tracing::debug!("Skipping undecodable cache file {}: {}", path.display(), e);
            return;
        }
    };

    if entry.is_fresh_at(now) {
        return;
    }

    tracing::debug!("Removing expired cache file {}", path.display());
    if let Err(e) = fs::remove_file(path) {
        tracing::debug!("Could not remove {}: {}", path.display(), e);
    }
}

fn list_dir(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(entries) => entries.filter_map(|e| e.ok()).map(|e| e.path()).collect(),
        Err(e) => {
            tracing::debug!("Could not read cache directory {}: {}", dir.display(), e);
            Vec::new()
        }
    }
}

/// Phase one of a sweep: remove expired entries in `dir`, descending into
/// subdirectories when `recursive` is set.
pub(crate) fn sweep_expired<T>(dir: &Path, now: DateTime<Utc>, recursive: bool)
where
    T: DeserializeOwned + Expiring,
{
    for path in list_dir(dir) {
        if path.is_dir() {
            if recursive {
                sweep_expired::<T>(&path, now, recursive);
            }
        } else if is_cache_file(&path) {
            remove_if_expired::<T>(&path, now);
        }
    }
}

/// Phase two: remove every directory below `root` that is now empty. The
/// root itself is kept.
pub(crate) fn remove_empty_dirs(root: &Path) {
    for path in list_dir(root) {
        if !path.is_dir() {
            continue;
        }

        remove_empty_dirs(&path);

        let is_empty = fs::read_dir(&path)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if is_empty {
            tracing::debug!("Removing empty cache directory {}", path.display());
            if let Err(e) = fs::remove_dir(&path) {
                tracing::warn!("Could not remove empty cache directory {}: {}", path.display(), e);
            }
        }
    }
}
