pub mod domain;
pub mod reconcile;

pub use domain::*;
pub use reconcile::{
    reconcile, reconcile_with, Lookup, ReconcileAction, ReconcileChange, ReconcileError,
    ReconcileOptions, ReconcileReport, RecordStore, StoreOperation,
};
