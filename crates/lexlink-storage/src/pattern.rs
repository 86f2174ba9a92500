//! Basic graph patterns evaluated against a triple source

use crate::error::StorageResult;
use crate::traits::TripleSource;
use lexlink_core::{Iri, Node, Triple};
use std::collections::BTreeMap;

/// Variable name → bound node
pub type Bindings = BTreeMap<String, Node>;

/// A pattern position: a variable or a fixed node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Var(String),
    Node(Node),
}

impl Term {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    /// Resolve against the current bindings; `None` for a free variable
    fn bound<'a>(&'a self, bindings: &'a Bindings) -> Option<&'a Node> {
        match self {
            Self::Var(name) => bindings.get(name),
            Self::Node(node) => Some(node),
        }
    }
}

impl From<Node> for Term {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Node(Node::Iri(iri))
    }
}

/// One triple pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl TriplePattern {
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    fn extend(&self, bindings: &Bindings, triple: &Triple) -> Option<Bindings> {
        let mut out = bindings.clone();
        let predicate = Node::Iri(triple.predicate.clone());
        for (term, node) in [
            (&self.subject, &triple.subject),
            (&self.predicate, &predicate),
            (&self.object, &triple.object),
        ] {
            match term {
                Term::Node(fixed) if fixed != node => return None,
                Term::Node(_) => {}
                Term::Var(name) => match out.get(name) {
                    Some(existing) if existing != node => return None,
                    Some(_) => {}
                    None => {
                        out.insert(name.clone(), node.clone());
                    }
                },
            }
        }
        Some(out)
    }
}

/// Conjunctive set of triple patterns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicGraphPattern {
    patterns: Vec<TriplePattern>,
}

impl BasicGraphPattern {
    pub fn new(patterns: Vec<TriplePattern>) -> Self {
        Self { patterns }
    }

    pub fn single(pattern: TriplePattern) -> Self {
        Self::new(vec![pattern])
    }

    /// Every solution, joining patterns left to right
    pub fn evaluate(&self, source: &dyn TripleSource) -> StorageResult<Vec<Bindings>> {
        let mut solutions = vec![Bindings::new()];

        for pattern in &self.patterns {
            let mut next = Vec::new();
            for bindings in &solutions {
                let subject = pattern.subject.bound(bindings);
                let predicate = match pattern.predicate.bound(bindings) {
                    Some(Node::Iri(iri)) => Some(iri),
                    // a predicate bound to a non-identifier can never match
                    Some(_) => continue,
                    None => None,
                };
                let object = pattern.object.bound(bindings);

                for triple in source.find(subject, predicate, object)? {
                    if let Some(extended) = pattern.extend(bindings, &triple) {
                        next.push(extended);
                    }
                }
            }
            solutions = next;
            if solutions.is_empty() {
                break;
            }
        }

        Ok(solutions)
    }
}
