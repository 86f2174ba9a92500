//! Entity resolution: subject → expanded entity
//!
//! Every public entry point runs its queries inside one coordinated read
//! transaction. The `*_in` helpers take an already-open source so several
//! resolutions can share a transaction.

use crate::error::StorageResult;
use crate::pattern::{BasicGraphPattern, Term, TriplePattern};
use crate::traits::{TripleSource, TripleStore};
use crate::txn::run_in_transaction;
use dashmap::DashMap;
use lexlink_core::vocab::LABEL_PREDICATES;
use lexlink_core::{Attr, BlankRef, ExpandedEntity, Iri, LabelMap, Node, Predicate, Value};
use std::collections::BTreeMap;

/// Process-wide identifier → label cache
///
/// Unbounded and keyed by identifier; only valid while the store behind it is
/// not mutated. Cleared when the store is replaced.
#[derive(Debug, Default)]
pub struct LabelCache {
    labels: DashMap<Iri, Option<Attr>>,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Best-available label for `iri`; the first label predicate with a literal wins
    pub fn label(&self, source: &dyn TripleSource, iri: &Iri) -> StorageResult<Option<Attr>> {
        if let Some(hit) = self.labels.get(iri) {
            return Ok(hit.value().clone());
        }

        let subject = Node::Iri(iri.clone());
        let mut label = None;
        for predicate in LABEL_PREDICATES {
            let literals = source
                .find(Some(&subject), Some(&Iri::new(predicate)), None)?
                .into_iter()
                .filter_map(|t| match t.object {
                    Node::Literal(lit) => Some(Value::Literal(lit)),
                    _ => None,
                });
            if let Some(attr) = Attr::from_values(literals) {
                label = Some(attr);
                break;
            }
        }

        self.labels.insert(iri.clone(), label.clone());
        Ok(label)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn clear(&self) {
        self.labels.clear();
    }
}

/// An entity together with its one-hop blank-node entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedResource {
    pub entity: ExpandedEntity,
    pub blanks: BTreeMap<BlankRef, ExpandedEntity>,
}

fn to_value(node: Node, subject: &Iri, predicate: &Predicate) -> Value {
    match node {
        Node::Iri(iri) => Value::Iri(iri),
        Node::Literal(lit) => Value::Literal(lit),
        Node::Blank(id) => Value::Blank(BlankRef::new(id, subject.clone(), predicate.clone())),
    }
}

fn attach_labels(
    source: &dyn TripleSource,
    entity: ExpandedEntity,
    cache: &LabelCache,
) -> StorageResult<ExpandedEntity> {
    let mut labels = LabelMap::new();
    for iri in entity.identifiers() {
        if let Some(label) = cache.label(source, &iri)? {
            labels.insert(iri, label);
        }
    }
    Ok(entity.with_labels(labels))
}

/// Resolve `subject` against an open source
pub fn expanded_entity_in(
    source: &dyn TripleSource,
    subject: &Iri,
    cache: &LabelCache,
) -> StorageResult<Option<ExpandedEntity>> {
    let node = Node::Iri(subject.clone());
    let outgoing = BasicGraphPattern::single(TriplePattern::new(
        node.clone(),
        Term::var("p"),
        Term::var("o"),
    ));
    let incoming = BasicGraphPattern::single(TriplePattern::new(
        Term::var("s"),
        Term::var("p"),
        node,
    ));

    let mut builder = ExpandedEntity::builder(subject.clone());
    for (pattern, inverse, var) in [(&outgoing, false, "o"), (&incoming, true, "s")] {
        for mut row in pattern.evaluate(source)? {
            let (Some(Node::Iri(p)), Some(value)) = (row.remove("p"), row.remove(var)) else {
                continue;
            };
            let predicate = Predicate { iri: p, inverse };
            let value = to_value(value, subject, &predicate);
            builder.add(predicate, value);
        }
    }

    if builder.is_empty() {
        tracing::debug!("No triples for {}", subject);
        return Ok(None);
    }

    let entity = attach_labels(source, builder.build(), cache)?;
    tracing::debug!("Resolved {} with {} attributes", subject, entity.len());
    Ok(Some(entity))
}

/// Resolve a blank node's outgoing attributes through its edge
///
/// Local ids are only meaningful within one query context; when the recorded
/// id is no longer found on the edge, every blank node on the edge is merged.
pub fn blank_entity_in(
    source: &dyn TripleSource,
    blank: &BlankRef,
    cache: &LabelCache,
) -> StorageResult<ExpandedEntity> {
    let origin = Node::Iri(blank.origin_subject.clone());
    let edge_iri = blank.origin_predicate.iri.clone();
    let edge = if blank.origin_predicate.inverse {
        TriplePattern::new(Term::var("b"), edge_iri, origin)
    } else {
        TriplePattern::new(origin, edge_iri, Term::var("b"))
    };
    let bgp = BasicGraphPattern::new(vec![
        edge,
        TriplePattern::new(Term::var("b"), Term::var("p"), Term::var("o")),
    ]);

    let rows: Vec<_> = bgp
        .evaluate(source)?
        .into_iter()
        .filter(|row| matches!(row.get("b"), Some(Node::Blank(_))))
        .collect();
    let exact = rows
        .iter()
        .any(|row| row.get("b") == Some(&Node::Blank(blank.local_id.clone())));

    let mut builder = ExpandedEntity::builder(blank.origin_subject.clone());
    for mut row in rows {
        if exact && row.get("b") != Some(&Node::Blank(blank.local_id.clone())) {
            continue;
        }
        let (Some(Node::Iri(p)), Some(value)) = (row.remove("p"), row.remove("o")) else {
            continue;
        };
        let predicate = Predicate::outgoing(p);
        // nested blank values stay placeholders
        let value = to_value(value, &blank.origin_subject, &predicate);
        builder.add(predicate, value);
    }

    attach_labels(source, builder.build(), cache)
}

/// Entity for `subject`, or `None` when the store holds no triple about it
pub fn expanded_entity(
    store: &dyn TripleStore,
    subject: &Iri,
    cache: &LabelCache,
) -> StorageResult<Option<ExpandedEntity>> {
    run_in_transaction(store.handle(), |source| expanded_entity_in(source, subject, cache))
}

pub fn blank_entity(
    store: &dyn TripleStore,
    blank: &BlankRef,
    cache: &LabelCache,
) -> StorageResult<ExpandedEntity> {
    run_in_transaction(store.handle(), |source| blank_entity_in(source, blank, cache))
}

/// Entity plus every blank entity it references, in one transaction
pub fn resolve_resource(
    store: &dyn TripleStore,
    subject: &Iri,
    cache: &LabelCache,
) -> StorageResult<Option<ResolvedResource>> {
    run_in_transaction(store.handle(), |source| {
        let Some(entity) = expanded_entity_in(source, subject, cache)? else {
            return Ok(None);
        };

        let mut blanks = BTreeMap::new();
        for blank in entity.blank_refs() {
            if !blanks.contains_key(blank) {
                let resolved = blank_entity_in(source, blank, cache)?;
                blanks.insert(blank.clone(), resolved);
            }
        }

        Ok(Some(ResolvedResource { entity, blanks }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryGraph;
    use crate::sqlite::SqliteModel;
    use lexlink_core::vocab::{RDFS_LABEL, SKOS_PREF_LABEL};
    use lexlink_core::{Literal, Triple};
    use std::collections::BTreeSet;

    const DN: &str = "https://wordnet.dk/dannet/data/";
    const HYPERNYM: &str = "https://globalwordnet.github.io/schemas/wn#hypernym";
    const SENTIMENT: &str = "https://wordnet.dk/dannet/schema/sentiment";
    const POLARITY: &str = "http://www.gsi.upm.es/ontologies/marl/ns#hasPolarity";

    fn dn(local: &str) -> Iri {
        Iri::new(format!("{DN}{local}"))
    }

    fn fixture() -> Vec<Triple> {
        vec![
            Triple::new(dn("synset-1"), HYPERNYM, dn("synset-2")),
            Triple::new(dn("synset-1"), RDFS_LABEL, Literal::lang("{hus}", "da")),
            Triple::new(dn("synset-3"), HYPERNYM, dn("synset-1")),
            Triple::new(dn("synset-1"), SENTIMENT, Node::blank("s1")),
            Triple::new(Node::blank("s1"), POLARITY, Literal::plain("positive")),
            Triple::new(dn("synset-2"), SKOS_PREF_LABEL, Literal::lang("bygning", "da")),
            Triple::new(dn("synset-2"), SKOS_PREF_LABEL, Literal::lang("building", "en")),
        ]
    }

    fn stores() -> Vec<Box<dyn TripleStore>> {
        let memory = MemoryGraph::new();
        memory.insert_triples(&fixture()).unwrap();
        let memory_txn = MemoryGraph::with_transactions();
        memory_txn.insert_triples(&fixture()).unwrap();
        let sqlite = SqliteModel::in_memory().unwrap();
        sqlite.insert_triples(&fixture()).unwrap();
        vec![Box::new(memory), Box::new(memory_txn), Box::new(sqlite)]
    }

    #[test]
    fn test_keys_are_outgoing_plus_inverse() {
        for store in stores() {
            let cache = LabelCache::new();
            let entity = expanded_entity(store.as_ref(), &dn("synset-1"), &cache)
                .unwrap()
                .unwrap();

            let keys: BTreeSet<String> = entity.predicates().map(|p| p.to_string()).collect();
            let expected: BTreeSet<String> = [
                HYPERNYM.to_string(),
                RDFS_LABEL.to_string(),
                SENTIMENT.to_string(),
                format!("^{HYPERNYM}"),
            ]
            .into_iter()
            .collect();
            assert_eq!(keys, expected, "backend {}", store.name());
        }
    }

    #[test]
    fn test_absent_subject_is_none() {
        for store in stores() {
            let cache = LabelCache::new();
            assert!(expanded_entity(store.as_ref(), &dn("nothing"), &cache)
                .unwrap()
                .is_none());
        }
    }

    #[test]
    fn test_labels_attached() {
        let store = MemoryGraph::new();
        store.insert_triples(&fixture()).unwrap();
        let cache = LabelCache::new();
        let entity = expanded_entity(&store, &dn("synset-1"), &cache).unwrap().unwrap();

        assert_eq!(
            entity.label(&dn("synset-1")),
            Some(&Attr::One(Literal::lang("{hus}", "da").into()))
        );
        // falls through to skos:prefLabel
        assert!(entity.label(&dn("synset-2")).unwrap().is_set());
        assert!(entity.label(&dn("synset-3")).is_none());
        assert!(!cache.is_empty());

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_blank_entity_through_edge() {
        let store = MemoryGraph::new();
        store.insert_triples(&fixture()).unwrap();
        let cache = LabelCache::new();
        let resolved = resolve_resource(&store, &dn("synset-1"), &cache)
            .unwrap()
            .unwrap();

        assert_eq!(resolved.blanks.len(), 1);
        let (blank, entity) = resolved.blanks.iter().next().unwrap();
        assert_eq!(blank.origin_subject, dn("synset-1"));
        assert_eq!(blank.origin_predicate, Predicate::outgoing(SENTIMENT));
        assert_eq!(entity.subject, dn("synset-1"));
        assert_eq!(
            entity.get(&Predicate::outgoing(POLARITY)),
            Some(&Attr::One(Literal::plain("positive").into()))
        );

        // a stale local id still resolves through the edge
        let stale = BlankRef::new("gone", dn("synset-1"), Predicate::outgoing(SENTIMENT));
        let merged = blank_entity(&store, &stale, &cache).unwrap();
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_blank_entity_through_inverse_edge() {
        const SENSE: &str = "https://www.w3.org/ns/lemon/ontolex#isLexicalizedSenseOf";
        const NOTE: &str = "http://www.w3.org/2004/02/skos/core#note";
        let triples = vec![
            Triple::new(Node::blank("sense"), SENSE, dn("synset-9")),
            Triple::new(Node::blank("sense"), NOTE, Literal::plain("x")),
        ];
        let memory = MemoryGraph::new();
        memory.insert_triples(&triples).unwrap();
        let sqlite = SqliteModel::in_memory().unwrap();
        sqlite.insert_triples(&triples).unwrap();
        let stores: Vec<Box<dyn TripleStore>> = vec![Box::new(memory), Box::new(sqlite)];

        for store in stores {
            let cache = LabelCache::new();
            let entity = expanded_entity(store.as_ref(), &dn("synset-9"), &cache)
                .unwrap()
                .unwrap();
            let inverse = Predicate::inverse(Iri::new(SENSE));
            let Some(Attr::One(Value::Blank(blank))) = entity.get(&inverse) else {
                panic!("expected a blank under ^sense, got {:?}", entity.get(&inverse));
            };
            assert_eq!(blank.origin_subject, dn("synset-9"));
            assert_eq!(blank.origin_predicate, inverse);

            let resolved = resolve_resource(store.as_ref(), &dn("synset-9"), &cache)
                .unwrap()
                .unwrap();
            let inlined = &resolved.blanks[blank];
            assert_eq!(
                inlined.get(&Predicate::outgoing(Iri::new(NOTE))),
                Some(&Attr::One(Literal::plain("x").into())),
                "backend {}",
                store.name()
            );
        }
    }
}
