//! JSON-lines triple loader
//!
//! One serialized [`Triple`] per line; blank lines are skipped.

use crate::error::{StorageError, StorageResult};
use crate::traits::TripleStore;
use lexlink_core::Triple;
use std::io::BufRead;

const BATCH_SIZE: usize = 10_000;

/// Load every triple from `reader`; returns the number of new triples
pub fn load_jsonl(reader: impl BufRead, store: &dyn TripleStore) -> StorageResult<usize> {
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut inserted = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let triple: Triple = serde_json::from_str(line).map_err(|e| StorageError::InvalidTriple {
            line: idx + 1,
            message: e.to_string(),
        })?;
        batch.push(triple);

        if batch.len() >= BATCH_SIZE {
            inserted += store.insert_triples(&batch)?;
            batch.clear();
        }
    }
    if !batch.is_empty() {
        inserted += store.insert_triples(&batch)?;
    }

    tracing::info!("Loaded {} triples into {} store", inserted, store.name());
    Ok(inserted)
}
