use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use phonenorm_store::backup::BackupSnapshot;
use phonenorm_store::error::StoreError;
use phonenorm_store::paths;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Snapshot file; defaults to a timestamped file in `backups/` beside the database
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub(crate) struct BackupSummary {
    pub path: String,
    pub size_bytes: u64,
    pub phone_count: i64,
}

impl From<BackupSnapshot> for BackupSummary {
    fn from(snapshot: BackupSnapshot) -> Self {
        Self {
            path: snapshot.path.display().to_string(),
            size_bytes: snapshot.size_bytes,
            phone_count: snapshot.phone_count,
        }
    }
}

pub fn backup(ctx: &Context<'_>, args: BackupArgs) -> Result<()> {
    let summary = write_snapshot(ctx, args.out)?;
    if ctx.json {
        return print_json(&summary);
    }
    print_summary(&summary);
    Ok(())
}

/// Snapshots the open database, to `out` or the default backup location.
pub(crate) fn write_snapshot(ctx: &Context<'_>, out: Option<PathBuf>) -> Result<BackupSummary> {
    let out = out.unwrap_or_else(|| paths::backup_path_in(&paths::backup_dir_for(ctx.db_path)));
    let snapshot = match ctx.store.backup_to(&out) {
        Ok(snapshot) => snapshot,
        Err(err @ StoreError::InvalidBackupPath(_)) => {
            return Err(err).with_context(|| {
                format!("refusing to back up over the live database: {}", out.display())
            });
        }
        Err(err) => {
            return Err(err).with_context(|| format!("backup database to {}", out.display()));
        }
    };
    info!(
        path = %snapshot.path.display(),
        phones = snapshot.phone_count,
        "snapshot written"
    );
    Ok(snapshot.into())
}

pub(crate) fn print_summary(summary: &BackupSummary) {
    println!(
        "backed up {} phone numbers to {}",
        summary.phone_count, summary.path
    );
}
