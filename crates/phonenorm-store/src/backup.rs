//! Point-in-time copies of the phone table, taken before a pass rewrites it.

use crate::db;
use crate::error::{Result, StoreError};
use crate::paths;
use crate::repo::PhonesRepo;
use rusqlite::backup::Backup;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const PAGES_PER_STEP: i32 = 256;
const STEP_PAUSE: Duration = Duration::from_millis(10);
const LIVE_SUFFIXES: [&str; 4] = ["", "-wal", "-shm", "-journal"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupSnapshot {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Rows in `phone_numbers` as copied, read back from the snapshot file.
    pub phone_count: i64,
}

pub fn snapshot(conn: &Connection, path: &Path) -> Result<BackupSnapshot> {
    paths::ensure_parent_dir(path)?;
    let target = resolve_target(path)?;
    if writes_over_live_db(conn, &target)? {
        return Err(StoreError::InvalidBackupPath(path.to_path_buf()));
    }

    {
        let mut dest = Connection::open(&target)?;
        Backup::new(conn, &mut dest)?.run_to_completion(PAGES_PER_STEP, STEP_PAUSE, None)?;
    }
    db::restrict_db_permissions(&target)?;

    let phone_count = {
        let copy = Connection::open(&target)?;
        PhonesRepo::new(&copy).count()?
    };
    let size_bytes = fs::metadata(&target)?.len();
    debug!(path = %target.display(), size_bytes, phone_count, "backup written");

    Ok(BackupSnapshot {
        path: target,
        size_bytes,
        phone_count,
    })
}

/// Canonical parent plus the requested file name; the file itself may not exist yet.
fn resolve_target(path: &Path) -> Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidBackupPath(path.to_path_buf()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    Ok(fs::canonicalize(parent)?.join(name))
}

fn writes_over_live_db(conn: &Connection, target: &Path) -> Result<bool> {
    let Some(live) = conn.path().filter(|path| !path.is_empty()) else {
        return Ok(false);
    };
    let live = fs::canonicalize(live)?;
    let by_name = LIVE_SUFFIXES.iter().any(|suffix| {
        let mut name = live.clone().into_os_string();
        name.push(suffix);
        target == Path::new(&name)
    });
    Ok(by_name || same_inode(target, &live))
}

#[cfg(unix)]
fn same_inode(left: &Path, right: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(left), fs::metadata(right)) {
        (Ok(left), Ok(right)) => left.dev() == right.dev() && left.ino() == right.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_inode(_left: &Path, _right: &Path) -> bool {
    false
}
