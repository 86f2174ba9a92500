//! ReDB triple store
//!
//! Triples are stored twice, keyed subject-first and object-first. Keys join
//! the N-Triples form of each position with a unit separator, so a key prefix
//! selects every triple sharing the leading positions.

use crate::error::StorageResult;
use crate::traits::{Dataset, StoreHandle, TripleSource, TripleStore, TxnBody};
use lexlink_core::{Iri, Node, Triple};
use redb::{Database, ReadOnlyTable, ReadableTable, TableDefinition};
use std::path::Path;

// Table definitions
const SPO: TableDefinition<&str, &[u8]> = TableDefinition::new("spo");
const OSP: TableDefinition<&str, &[u8]> = TableDefinition::new("osp");

const SEP: char = '\u{1f}';

fn spo_key(triple: &Triple) -> String {
    format!(
        "{}{SEP}{}{SEP}{}",
        triple.subject.to_ntriples(),
        triple.predicate,
        triple.object.to_ntriples()
    )
}

fn osp_key(triple: &Triple) -> String {
    format!(
        "{}{SEP}{}{SEP}{}",
        triple.object.to_ntriples(),
        triple.subject.to_ntriples(),
        triple.predicate
    )
}

/// ReDB-backed dataset; every read runs in a read transaction
pub struct RedbDataset {
    db: Database,
}

impl RedbDataset {
    /// Open or create a ReDB database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize tables
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(SPO)?;
            write_txn.open_table(OSP)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

/// Read view over one ReDB read transaction
struct RedbSnapshot {
    spo: ReadOnlyTable<&'static str, &'static [u8]>,
    osp: ReadOnlyTable<&'static str, &'static [u8]>,
}

impl RedbSnapshot {
    fn scan(
        table: &ReadOnlyTable<&'static str, &'static [u8]>,
        prefix: &str,
    ) -> StorageResult<Vec<Triple>> {
        let mut triples = Vec::new();
        for entry in table.range(prefix..)? {
            let (key, value) = entry?;
            if !key.value().starts_with(prefix) {
                break;
            }
            triples.push(serde_json::from_slice(value.value())?);
        }
        Ok(triples)
    }
}

impl TripleSource for RedbSnapshot {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StorageResult<Vec<Triple>> {
        let candidates = match (subject, object) {
            (Some(s), _) => {
                let mut prefix = format!("{}{SEP}", s.to_ntriples());
                if let Some(p) = predicate {
                    prefix.push_str(&format!("{}{SEP}", p));
                }
                Self::scan(&self.spo, &prefix)?
            }
            (None, Some(o)) => Self::scan(&self.osp, &format!("{}{SEP}", o.to_ntriples()))?,
            (None, None) => Self::scan(&self.spo, "")?,
        };

        Ok(candidates
            .into_iter()
            .filter(|t| t.matches(subject, predicate, object))
            .collect())
    }
}

impl Dataset for RedbDataset {
    fn calculate_read(&self, body: TxnBody<'_>) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let snapshot = RedbSnapshot {
            spo: read_txn.open_table(SPO)?,
            osp: read_txn.open_table(OSP)?,
        };
        body(&snapshot)
    }
}

impl TripleStore for RedbDataset {
    fn name(&self) -> &'static str {
        "redb"
    }

    fn handle(&self) -> StoreHandle<'_> {
        StoreHandle::Dataset(self)
    }

    fn health_check(&self) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        read_txn.open_table(SPO)?;
        Ok(true)
    }

    fn triple_count(&self) -> StorageResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SPO)?;
        let mut count = 0;
        for entry in table.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    fn insert_triples(&self, triples: &[Triple]) -> StorageResult<usize> {
        let write_txn = self.db.begin_write()?;
        let mut inserted = 0;
        {
            let mut spo = write_txn.open_table(SPO)?;
            let mut osp = write_txn.open_table(OSP)?;
            for triple in triples {
                let value = serde_json::to_vec(triple)?;
                if spo.insert(spo_key(triple).as_str(), value.as_slice())?.is_none() {
                    inserted += 1;
                }
                osp.insert(osp_key(triple).as_str(), value.as_slice())?;
            }
        }
        write_txn.commit()?;
        tracing::debug!("Inserted {} new triples into redb", inserted);

        Ok(inserted)
    }
}
