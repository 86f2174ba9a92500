//! Lexlink Storage - Triple stores and entity resolution
//!
//! This crate provides the triple-store abstraction consumed by the server,
//! the transaction coordinator that gives every request a consistent read
//! view, the bundled backends, and the resolver that turns a subject into an
//! expanded entity.

#![allow(clippy::result_large_err)]

pub mod backend;
pub mod error;
pub mod import;
pub mod pattern;
pub mod resolver;
pub mod traits;
pub mod txn;

#[cfg(feature = "redb")]
pub mod redb;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod memory;

pub use backend::{open_store, BackendKind};
pub use error::{StorageError, StorageResult};
pub use import::load_jsonl;
pub use pattern::{BasicGraphPattern, Bindings, Term, TriplePattern};
pub use resolver::{blank_entity, expanded_entity, resolve_resource, LabelCache, ResolvedResource};
pub use traits::{Dataset, Graph, Model, StoreHandle, TransactionHandler, TripleSource, TripleStore, TxnBody};
pub use txn::{run_in_transaction, TxnCapability};

#[cfg(feature = "redb")]
pub use redb::RedbDataset;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteModel;

pub use memory::MemoryGraph;
