//! The normalize-and-dedupe pass over a [`RecordStore`].
//!
//! Records are visited once, in the order `list_all` returned them. A record
//! already in canonical form is left alone. Otherwise it is rewritten to its
//! canonical form, or deleted when another live record already holds that
//! value. Each mutation is applied to the store before the next record is
//! visited, and the first failing store call ends the pass.

mod error;
mod index;

#[cfg(test)]
mod tests;

pub use error::{ReconcileError, StoreOperation};

use crate::domain::{is_canonical, normalize_phone, PhoneId, PhoneRecord};
use index::ValueIndex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

pub trait RecordStore {
    type Error: std::error::Error + 'static;

    fn list_all(&self) -> Result<Vec<PhoneRecord>, Self::Error>;

    /// `Ok(None)` when no record holds `value`.
    fn find_by_value(&self, value: &str) -> Result<Option<PhoneRecord>, Self::Error>;

    fn update_value(&self, id: PhoneId, value: &str) -> Result<(), Self::Error>;

    fn delete_by_id(&self, id: PhoneId) -> Result<(), Self::Error>;
}

/// Where duplicate lookups are answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookup {
    /// In-memory index built from the snapshot and kept current by the pass.
    #[default]
    Index,
    /// One `find_by_value` call per non-canonical record.
    Store,
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Index => f.write_str("index"),
            Lookup::Store => f.write_str("store"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub lookup: Lookup,
    /// Decide everything, mutate nothing. Always answers lookups from the index.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileAction {
    Updated,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileChange {
    pub id: PhoneId,
    pub before: String,
    pub after: Option<String>,
    pub action: ReconcileAction,
    pub duplicate_of: Option<PhoneId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub examined: usize,
    pub unchanged: usize,
    pub updated: usize,
    pub deleted: usize,
    pub dry_run: bool,
    pub changes: Vec<ReconcileChange>,
}

pub fn reconcile<S>(store: &S) -> Result<ReconcileReport, ReconcileError<S::Error>>
where
    S: RecordStore + ?Sized,
{
    reconcile_with(store, ReconcileOptions::default())
}

pub fn reconcile_with<S>(
    store: &S,
    options: ReconcileOptions,
) -> Result<ReconcileReport, ReconcileError<S::Error>>
where
    S: RecordStore + ?Sized,
{
    let records = store
        .list_all()
        .map_err(|source| ReconcileError::List { source })?;
    let lookup = if options.dry_run {
        Lookup::Index
    } else {
        options.lookup
    };
    info!(
        records = records.len(),
        %lookup,
        dry_run = options.dry_run,
        "reconciliation started"
    );

    let mut index = ValueIndex::from_records(&records);
    let mut report = ReconcileReport {
        dry_run: options.dry_run,
        ..ReconcileReport::default()
    };

    for record in records {
        report.examined += 1;
        if is_canonical(&record.value) {
            debug!(id = %record.id, value = %record.value, "record unchanged");
            report.unchanged += 1;
            continue;
        }
        let normalized = normalize_phone(&record.value);

        let duplicate_of = match lookup {
            Lookup::Index => index.find_other(&normalized, record.id),
            Lookup::Store => store
                .find_by_value(&normalized)
                .map_err(|source| ReconcileError::Find {
                    id: record.id,
                    value: normalized.clone(),
                    source,
                })?
                .map(|existing| existing.id)
                .filter(|existing| *existing != record.id),
        };

        match duplicate_of {
            Some(existing) => {
                if !options.dry_run {
                    store
                        .delete_by_id(record.id)
                        .map_err(|source| ReconcileError::Delete {
                            id: record.id,
                            source,
                        })?;
                }
                index.remove(record.id, &record.value);
                debug!(
                    id = %record.id,
                    value = %record.value,
                    duplicate_of = %existing,
                    "duplicate record deleted"
                );
                report.deleted += 1;
                report.changes.push(ReconcileChange {
                    id: record.id,
                    before: record.value,
                    after: None,
                    action: ReconcileAction::Deleted,
                    duplicate_of: Some(existing),
                });
            }
            None => {
                if !options.dry_run {
                    store
                        .update_value(record.id, &normalized)
                        .map_err(|source| ReconcileError::Update {
                            id: record.id,
                            value: normalized.clone(),
                            source,
                        })?;
                }
                index.relabel(record.id, &record.value, &normalized);
                debug!(
                    id = %record.id,
                    before = %record.value,
                    after = %normalized,
                    "record updated"
                );
                report.updated += 1;
                report.changes.push(ReconcileChange {
                    id: record.id,
                    before: record.value,
                    after: Some(normalized),
                    action: ReconcileAction::Updated,
                    duplicate_of: None,
                });
            }
        }
    }

    info!(
        examined = report.examined,
        unchanged = report.unchanged,
        updated = report.updated,
        deleted = report.deleted,
        "reconciliation finished"
    );
    Ok(report)
}
