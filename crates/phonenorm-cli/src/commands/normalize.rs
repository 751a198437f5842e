use crate::commands::backup::{print_summary, write_snapshot, BackupSummary};
use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use phonenorm_core::{reconcile_with, Lookup, ReconcileAction, ReconcileOptions, ReconcileReport};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Report what would change without touching the database
    #[arg(long)]
    pub dry_run: bool,
    /// Snapshot the database before changing it; the path is reported
    #[arg(long)]
    pub backup: bool,
    /// Duplicate lookup: index (in memory) or store (query per record)
    #[arg(long)]
    pub lookup: Option<String>,
}

/// A pass report plus the snapshot taken before it, if any.
#[derive(Debug, Serialize)]
pub(crate) struct PassOutcome {
    #[serde(flatten)]
    pub report: ReconcileReport,
    pub backup: Option<BackupSummary>,
}

pub fn normalize(ctx: &Context<'_>, args: NormalizeArgs) -> Result<()> {
    let lookup = match args.lookup {
        Some(value) => parse_lookup(&value)?,
        None => ctx.config.normalize.lookup,
    };
    let backup = !args.dry_run && (args.backup || ctx.config.normalize.backup_before);
    let options = ReconcileOptions {
        lookup,
        dry_run: args.dry_run,
    };

    let outcome = run_pass(ctx, options, backup)?;
    if ctx.json {
        return print_json(&outcome);
    }
    if let Some(summary) = &outcome.backup {
        print_summary(summary);
    }
    print_report(&outcome.report);
    Ok(())
}

pub(crate) fn run_pass(
    ctx: &Context<'_>,
    options: ReconcileOptions,
    backup: bool,
) -> Result<PassOutcome> {
    let backup = if backup {
        Some(write_snapshot(ctx, None)?)
    } else {
        None
    };

    let report = reconcile_with(&ctx.store.phones(), options)
        .with_context(|| "normalize phone numbers")?;
    Ok(PassOutcome { report, backup })
}

fn parse_lookup(raw: &str) -> Result<Lookup> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "index" => Ok(Lookup::Index),
        "store" => Ok(Lookup::Store),
        _ => Err(invalid_input("invalid lookup: expected index|store")),
    }
}

pub(crate) fn print_report(report: &ReconcileReport) {
    for change in &report.changes {
        match change.action {
            ReconcileAction::Updated => println!(
                "updated {}: {} -> {}",
                change.id,
                change.before,
                change.after.as_deref().unwrap_or_default()
            ),
            ReconcileAction::Deleted => match change.duplicate_of {
                Some(existing) => println!(
                    "deleted {}: {} (duplicate of {})",
                    change.id, change.before, existing
                ),
                None => println!("deleted {}: {}", change.id, change.before),
            },
        }
    }

    let prefix = if report.dry_run { "dry run: " } else { "" };
    println!(
        "{}examined {}, unchanged {}, updated {}, deleted {}",
        prefix, report.examined, report.unchanged, report.updated, report.deleted
    );
}
