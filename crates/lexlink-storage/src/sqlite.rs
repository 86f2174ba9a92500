//! SQLite triple store

use crate::error::{StorageError, StorageResult};
use crate::traits::{Model, StoreHandle, TripleSource, TripleStore, TxnBody};
use lexlink_core::{Iri, Node, Triple};
use rusqlite::{params, params_from_iter, Connection, TransactionBehavior};
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed model
///
/// Transactional reads are on by default; [`SqliteModel::with_transactions`]
/// turns them off, in which case each lookup runs on its own.
pub struct SqliteModel {
    conn: Mutex<Connection>,
    transactional: bool,
}

impl SqliteModel {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path).map_err(|e| StorageError::Database(e.to_string()))?;
        Self::init(conn)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StorageError::Database(e.to_string()))?;
        Self::init(conn)
    }

    pub fn with_transactions(mut self, enabled: bool) -> Self {
        self.transactional = enabled;
        self
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS triples (
                subject TEXT NOT NULL,
                predicate TEXT NOT NULL,
                object TEXT NOT NULL,
                data TEXT NOT NULL,
                PRIMARY KEY (subject, predicate, object)
            );

            CREATE INDEX IF NOT EXISTS idx_triples_object ON triples(object);
            CREATE INDEX IF NOT EXISTS idx_triples_predicate ON triples(predicate);
            "#,
        )
        .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(Self {
            conn: Mutex::new(conn),
            transactional: true,
        })
    }
}

fn query_triples(
    conn: &Connection,
    subject: Option<&Node>,
    predicate: Option<&Iri>,
    object: Option<&Node>,
) -> StorageResult<Vec<Triple>> {
    let mut clauses = Vec::new();
    let mut args: Vec<String> = Vec::new();
    if let Some(s) = subject {
        args.push(s.to_ntriples());
        clauses.push(format!("subject = ?{}", args.len()));
    }
    if let Some(p) = predicate {
        args.push(p.as_str().to_string());
        clauses.push(format!("predicate = ?{}", args.len()));
    }
    if let Some(o) = object {
        args.push(o.to_ntriples());
        clauses.push(format!("object = ?{}", args.len()));
    }

    let mut sql = String::from("SELECT data FROM triples");
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params_from_iter(args.iter()), |row| row.get::<_, String>(0))?;

    let mut triples = Vec::new();
    for row in rows {
        triples.push(serde_json::from_str(&row?)?);
    }
    Ok(triples)
}

/// Read view over one open connection or transaction
struct SqliteReader<'c>(&'c Connection);

impl TripleSource for SqliteReader<'_> {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StorageResult<Vec<Triple>> {
        query_triples(self.0, subject, predicate, object)
    }
}

impl TripleSource for SqliteModel {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StorageResult<Vec<Triple>> {
        let conn = self.conn.lock().map_err(StorageError::lock)?;
        query_triples(&conn, subject, predicate, object)
    }
}

impl Model for SqliteModel {
    fn supports_transactions(&self) -> bool {
        self.transactional
    }

    fn calculate_in_transaction(&self, body: TxnBody<'_>) -> StorageResult<()> {
        let mut conn = self.conn.lock().map_err(StorageError::lock)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
        // dropping the transaction on error rolls it back
        body(&SqliteReader(&tx))?;
        tx.commit()?;
        Ok(())
    }

    fn as_source(&self) -> &dyn TripleSource {
        self
    }
}

impl TripleStore for SqliteModel {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn handle(&self) -> StoreHandle<'_> {
        StoreHandle::Model(self)
    }

    fn health_check(&self) -> StorageResult<bool> {
        let conn = self.conn.lock().map_err(StorageError::lock)?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(true)
    }

    fn triple_count(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().map_err(StorageError::lock)?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM triples", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn insert_triples(&self, triples: &[Triple]) -> StorageResult<usize> {
        let mut conn = self.conn.lock().map_err(StorageError::lock)?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO triples (subject, predicate, object, data) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for triple in triples {
                let data = serde_json::to_string(triple)?;
                inserted += stmt.execute(params![
                    triple.subject.to_ntriples(),
                    triple.predicate.as_str(),
                    triple.object.to_ntriples(),
                    data
                ])?;
            }
        }
        tx.commit()?;
        tracing::debug!("Inserted {} new triples into sqlite", inserted);

        Ok(inserted)
    }
}
