//! In-memory triple store

use crate::error::{StorageError, StorageResult};
use crate::traits::{Graph, StoreHandle, TransactionHandler, TripleSource, TripleStore, TxnBody};
use lexlink_core::{Iri, Node, Triple};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

#[derive(Debug, Default)]
struct TripleIndex {
    triples: Vec<Triple>,
    seen: HashSet<Triple>,
    by_subject: HashMap<Node, Vec<usize>>,
    by_object: HashMap<Node, Vec<usize>>,
}

impl TripleIndex {
    fn insert(&mut self, triple: Triple) -> bool {
        if !self.seen.insert(triple.clone()) {
            return false;
        }
        let idx = self.triples.len();
        self.by_subject.entry(triple.subject.clone()).or_default().push(idx);
        self.by_object.entry(triple.object.clone()).or_default().push(idx);
        self.triples.push(triple);
        true
    }
}

impl TripleSource for TripleIndex {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StorageResult<Vec<Triple>> {
        let candidates: Box<dyn Iterator<Item = &Triple> + '_> = match (subject, object) {
            (Some(s), _) => Box::new(
                self.by_subject
                    .get(s)
                    .into_iter()
                    .flatten()
                    .map(|&i| &self.triples[i]),
            ),
            (None, Some(o)) => Box::new(
                self.by_object
                    .get(o)
                    .into_iter()
                    .flatten()
                    .map(|&i| &self.triples[i]),
            ),
            (None, None) => Box::new(self.triples.iter()),
        };

        Ok(candidates
            .filter(|t| t.matches(subject, predicate, object))
            .cloned()
            .collect())
    }
}

/// In-memory graph store
///
/// Useful for tests and small datasets. Without transactions every lookup
/// takes the lock on its own; with them, one read guard spans the whole
/// request.
pub struct MemoryGraph {
    index: RwLock<TripleIndex>,
    transactional: bool,
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(TripleIndex::default()),
            transactional: false,
        }
    }

    pub fn with_transactions() -> Self {
        Self {
            transactional: true,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.index.read().map(|idx| idx.triples.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl TripleSource for MemoryGraph {
    fn find(
        &self,
        subject: Option<&Node>,
        predicate: Option<&Iri>,
        object: Option<&Node>,
    ) -> StorageResult<Vec<Triple>> {
        let index = self.index.read().map_err(StorageError::lock)?;
        index.find(subject, predicate, object)
    }
}

impl TransactionHandler for MemoryGraph {
    fn transactions_supported(&self) -> bool {
        self.transactional
    }

    fn execute_read(&self, body: TxnBody<'_>) -> StorageResult<()> {
        let index = self.index.read().map_err(StorageError::lock)?;
        body(&*index)
    }
}

impl Graph for MemoryGraph {
    fn transaction_handler(&self) -> &dyn TransactionHandler {
        self
    }

    fn as_source(&self) -> &dyn TripleSource {
        self
    }
}

impl TripleStore for MemoryGraph {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn handle(&self) -> StoreHandle<'_> {
        StoreHandle::Graph(self)
    }

    fn health_check(&self) -> StorageResult<bool> {
        Ok(!self.index.is_poisoned())
    }

    fn triple_count(&self) -> StorageResult<usize> {
        let index = self.index.read().map_err(StorageError::lock)?;
        Ok(index.triples.len())
    }

    fn insert_triples(&self, triples: &[Triple]) -> StorageResult<usize> {
        let mut index = self.index.write().map_err(StorageError::lock)?;
        Ok(triples
            .iter()
            .filter(|t| index.insert((*t).clone()))
            .count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txn::run_in_transaction;
    use lexlink_core::Literal;

    fn iri(s: &str) -> Iri {
        Iri::new(format!("http://x/{s}"))
    }

    #[test]
    fn test_memory_graph() {
        let graph = MemoryGraph::new();
        let inserted = graph
            .insert_triples(&[
                Triple::new(iri("a"), iri("p"), iri("b")),
                Triple::new(iri("a"), iri("p"), iri("b")),
                Triple::new(iri("a"), iri("label"), Literal::lang("hus", "da")),
                Triple::new(iri("c"), iri("p"), iri("a")),
            ])
            .unwrap();
        assert_eq!(inserted, 3);
        assert_eq!(graph.triple_count().unwrap(), 3);

        let a = Node::Iri(iri("a"));
        assert_eq!(graph.find(Some(&a), None, None).unwrap().len(), 2);
        assert_eq!(graph.find(None, None, Some(&a)).unwrap().len(), 1);
        assert_eq!(graph.find(None, Some(&iri("p")), None).unwrap().len(), 2);
        assert_eq!(
            graph
                .find(Some(&a), Some(&iri("label")), None)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn test_transactional_read() {
        let graph = MemoryGraph::with_transactions();
        graph
            .insert_triples(&[Triple::new(iri("a"), iri("p"), iri("b"))])
            .unwrap();
        assert!(graph.transactions_supported());

        let n = run_in_transaction(graph.handle(), |source| {
            Ok(source.find(None, None, None)?.len())
        })
        .unwrap();
        assert_eq!(n, 1);
    }
}
