//! Backend selection

use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryGraph;
use crate::traits::TripleStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Available store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Redb,
    Sqlite,
}

impl BackendKind {
    pub fn needs_path(&self) -> bool {
        !matches!(self, Self::Memory)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Memory => "memory",
            Self::Redb => "redb",
            Self::Sqlite => "sqlite",
        })
    }
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "redb" => Ok(Self::Redb),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(StorageError::Backend(format!("unknown backend '{}'", other))),
        }
    }
}

/// Open a store of the given kind
pub fn open_store(kind: BackendKind, path: Option<&Path>) -> StorageResult<Arc<dyn TripleStore>> {
    if kind.needs_path() && path.is_none() {
        return Err(StorageError::Backend(format!("the {} backend needs a path", kind)));
    }
    tracing::debug!("Opening {} store", kind);

    match (kind, path) {
        (BackendKind::Memory, _) => Ok(Arc::new(MemoryGraph::with_transactions())),

        #[cfg(feature = "redb")]
        (BackendKind::Redb, Some(path)) => Ok(Arc::new(crate::redb::RedbDataset::open(path)?)),

        #[cfg(feature = "sqlite")]
        (BackendKind::Sqlite, Some(path)) => Ok(Arc::new(crate::sqlite::SqliteModel::open(path)?)),

        (kind, _) => Err(StorageError::Backend(format!(
            "the {} backend is not compiled in",
            kind
        ))),
    }
}
