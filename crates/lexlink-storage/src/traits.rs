//! Triple store trait definitions
//!
//! A store exposes one of three shapes through [`StoreHandle`]. The shapes
//! differ only in how a consistent read view is obtained; see
//! [`crate::txn::run_in_transaction`].

use crate::error::StorageResult;
use lexlink_core::{Iri, Node, Triple};

/// Anything that can answer a single triple pattern
pub trait TripleSource {
    /// All triples matching the pattern; `None` positions are wildcards
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StorageResult<Vec<Triple>>;
}

/// Callback run inside a read transaction
pub type TxnBody<'a> = &'a mut dyn FnMut(&dyn TripleSource) -> StorageResult<()>;

// ─────────────────────────────────────────────────────────────────────────────
// Store shapes
// ─────────────────────────────────────────────────────────────────────────────

/// Transaction handler attached to a raw graph
pub trait TransactionHandler {
    fn transactions_supported(&self) -> bool;

    /// Run `body` against a consistent view; only called when supported
    fn execute_read(&self, body: TxnBody<'_>) -> StorageResult<()>;
}

/// Raw graph with an attached transaction handler
pub trait Graph: TripleSource {
    fn transaction_handler(&self) -> &dyn TransactionHandler;

    fn as_source(&self) -> &dyn TripleSource;
}

/// Model exposing a support flag and a compute-in-transaction method
pub trait Model: TripleSource {
    fn supports_transactions(&self) -> bool;

    fn calculate_in_transaction(&self, body: TxnBody<'_>) -> StorageResult<()>;

    fn as_source(&self) -> &dyn TripleSource;
}

/// Dataset whose reads are always transactional
pub trait Dataset {
    fn calculate_read(&self, body: TxnBody<'_>) -> StorageResult<()>;
}

/// Borrowed view of a store in its native shape
#[derive(Clone, Copy)]
pub enum StoreHandle<'a> {
    Graph(&'a dyn Graph),
    Model(&'a dyn Model),
    Dataset(&'a dyn Dataset),
}

// ─────────────────────────────────────────────────────────────────────────────
// Shared store
// ─────────────────────────────────────────────────────────────────────────────

/// Long-lived store shared by every request
pub trait TripleStore: Send + Sync {
    /// Backend name for logs and the health document
    fn name(&self) -> &'static str;

    fn handle(&self) -> StoreHandle<'_>;

    fn health_check(&self) -> StorageResult<bool>;

    fn triple_count(&self) -> StorageResult<usize>;

    /// Bulk load; returns the number of triples that were new.
    /// Never called on the request path.
    fn insert_triples(&self, triples: &[Triple]) -> StorageResult<usize>;
}
