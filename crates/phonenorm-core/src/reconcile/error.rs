use crate::domain::PhoneId;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    List,
    Find,
    Update,
    Delete,
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StoreOperation::List => "list",
            StoreOperation::Find => "find",
            StoreOperation::Update => "update",
            StoreOperation::Delete => "delete",
        };
        f.write_str(label)
    }
}

/// A store call failed and the pass stopped. Earlier changes stay applied.
#[derive(Debug, Error)]
pub enum ReconcileError<E>
where
    E: std::error::Error + 'static,
{
    #[error("list records: {source}")]
    List {
        #[source]
        source: E,
    },
    #[error("find duplicate of record {id} by value {value:?}: {source}")]
    Find {
        id: PhoneId,
        value: String,
        #[source]
        source: E,
    },
    #[error("update record {id} to {value:?}: {source}")]
    Update {
        id: PhoneId,
        value: String,
        #[source]
        source: E,
    },
    #[error("delete record {id}: {source}")]
    Delete {
        id: PhoneId,
        #[source]
        source: E,
    },
}

impl<E> ReconcileError<E>
where
    E: std::error::Error + 'static,
{
    pub fn operation(&self) -> StoreOperation {
        match self {
            ReconcileError::List { .. } => StoreOperation::List,
            ReconcileError::Find { .. } => StoreOperation::Find,
            ReconcileError::Update { .. } => StoreOperation::Update,
            ReconcileError::Delete { .. } => StoreOperation::Delete,
        }
    }

    pub fn record_id(&self) -> Option<PhoneId> {
        match self {
            ReconcileError::List { .. } => None,
            ReconcileError::Find { id, .. }
            | ReconcileError::Update { id, .. }
            | ReconcileError::Delete { id, .. } => Some(*id),
        }
    }

    pub fn store_error(&self) -> &E {
        match self {
            ReconcileError::List { source }
            | ReconcileError::Find { source, .. }
            | ReconcileError::Update { source, .. }
            | ReconcileError::Delete { source, .. } => source,
        }
    }

    pub fn into_source(self) -> E {
        match self {
            ReconcileError::List { source }
            | ReconcileError::Find { source, .. }
            | ReconcileError::Update { source, .. }
            | ReconcileError::Delete { source, .. } => source,
        }
    }
}
