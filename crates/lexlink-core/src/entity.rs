//! Expanded entity model: every known fact about one subject

use crate::error::Error;
use crate::node::{Iri, Literal};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{btree_set, BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Attribute key of an expanded entity
///
/// Outgoing facts are keyed by the plain predicate; facts where the entity is
/// the object are keyed by the inverse predicate, written `^iri`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Predicate {
    pub iri: Iri,
    pub inverse: bool,
}

impl Predicate {
    pub fn outgoing(iri: impl Into<Iri>) -> Self {
        Self {
            iri: iri.into(),
            inverse: false,
        }
    }

    pub fn inverse(iri: impl Into<Iri>) -> Self {
        Self {
            iri: iri.into(),
            inverse: true,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverse {
            f.write_str("^")?;
        }
        f.write_str(self.iri.as_str())
    }
}

impl FromStr for Predicate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (inverse, iri) = match s.strip_prefix('^') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        if iri.is_empty() {
            return Err(Error::InvalidPredicate(s.to_string()));
        }
        Ok(Self {
            iri: Iri::new(iri),
            inverse,
        })
    }
}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Edge-scoped blank node reference
///
/// A blank node has no global identity; it can only be resolved again by
/// following the edge recorded here.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlankRef {
    pub local_id: String,
    pub origin_subject: Iri,
    pub origin_predicate: Predicate,
}

impl BlankRef {
    pub fn new(local_id: impl Into<String>, origin_subject: Iri, origin_predicate: Predicate) -> Self {
        Self {
            local_id: local_id.into(),
            origin_subject,
            origin_predicate,
        }
    }
}

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Iri(Iri),
    Blank(BlankRef),
    Literal(Literal),
}

impl Value {
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_lang_literal(&self) -> bool {
        self.as_literal().is_some_and(Literal::is_lang_tagged)
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

/// Attribute: one value, or a set of two or more
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Attr {
    One(Value),
    Many(BTreeSet<Value>),
}

impl Attr {
    /// Collapse values into an attribute; `None` when empty, never a singleton set
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Option<Self> {
        let mut set: BTreeSet<Value> = values.into_iter().collect();
        match set.len() {
            0 => None,
            1 => set.pop_first().map(Self::One),
            _ => Some(Self::Many(set)),
        }
    }

    pub fn iter(&self) -> AttrIter<'_> {
        match self {
            Self::One(value) => AttrIter::One(Some(value)),
            Self::Many(set) => AttrIter::Many(set.iter()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// A language-tagged literal, or a set holding at least one
    pub fn is_lang_tagged(&self) -> bool {
        self.iter().any(Value::is_lang_literal)
    }
}

impl From<Value> for Attr {
    fn from(value: Value) -> Self {
        Self::One(value)
    }
}

/// Iterator over the values of an [`Attr`]
pub enum AttrIter<'a> {
    One(Option<&'a Value>),
    Many(btree_set::Iter<'a, Value>),
}

impl<'a> Iterator for AttrIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::One(value) => value.take(),
            Self::Many(iter) => iter.next(),
        }
    }
}

/// Identifier → label value
pub type LabelMap = BTreeMap<Iri, Attr>;

/// Every known fact about one subject, plus the labels needed to present it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedEntity {
    /// Originating subject (for blank entities: the subject of the edge)
    pub subject: Iri,

    pub attributes: BTreeMap<Predicate, Attr>,

    #[serde(default)]
    pub labels: LabelMap,
}

impl ExpandedEntity {
    pub fn builder(subject: Iri) -> EntityBuilder {
        EntityBuilder::new(subject)
    }

    pub fn get(&self, predicate: &Predicate) -> Option<&Attr> {
        self.attributes.get(predicate)
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.attributes.keys()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attach the label map; only used while the entity is being built
    pub fn with_labels(mut self, labels: LabelMap) -> Self {
        self.labels = labels;
        self
    }

    pub fn label(&self, iri: &Iri) -> Option<&Attr> {
        self.labels.get(iri)
    }

    /// Every identifier appearing in the entity: subject, predicates and values
    pub fn identifiers(&self) -> BTreeSet<Iri> {
        let mut ids = BTreeSet::new();
        ids.insert(self.subject.clone());
        for (predicate, attr) in &self.attributes {
            ids.insert(predicate.iri.clone());
            for value in attr.iter() {
                match value {
                    Value::Iri(iri) => {
                        ids.insert(iri.clone());
                    }
                    Value::Literal(Literal {
                        datatype: Some(dt), ..
                    }) => {
                        ids.insert(dt.clone());
                    }
                    _ => {}
                }
            }
        }
        ids
    }

    pub fn blank_refs(&self) -> Vec<&BlankRef> {
        self.attributes
            .values()
            .flat_map(Attr::iter)
            .filter_map(|value| match value {
                Value::Blank(blank) => Some(blank),
                _ => None,
            })
            .collect()
    }
}

/// Accumulates (predicate, value) rows and groups them by predicate
#[derive(Debug)]
pub struct EntityBuilder {
    subject: Iri,
    rows: BTreeMap<Predicate, BTreeSet<Value>>,
}

impl EntityBuilder {
    pub fn new(subject: Iri) -> Self {
        Self {
            subject,
            rows: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, predicate: Predicate, value: Value) -> &mut Self {
        self.rows.entry(predicate).or_default().insert(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn build(self) -> ExpandedEntity {
        let attributes = self
            .rows
            .into_iter()
            .filter_map(|(predicate, values)| Attr::from_values(values).map(|attr| (predicate, attr)))
            .collect();
        ExpandedEntity {
            subject: self.subject,
            attributes,
            labels: LabelMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DN: &str = "https://wordnet.dk/dannet/data/";
    const WN_HYPERNYM: &str = "https://globalwordnet.github.io/schemas/wn#hypernym";
    const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";

    fn iri(local: &str) -> Iri {
        Iri::new(format!("{DN}{local}"))
    }

    #[test]
    fn test_predicate_string_form() {
        let p = Predicate::inverse(WN_HYPERNYM);
        assert_eq!(p.to_string(), format!("^{WN_HYPERNYM}"));
        assert_eq!(p.to_string().parse::<Predicate>().unwrap(), p);
        assert!("^".parse::<Predicate>().is_err());
    }

    #[test]
    fn test_attr_never_singleton_set() {
        let one = Attr::from_values(vec![Value::Iri(iri("a")), Value::Iri(iri("a"))]).unwrap();
        assert!(!one.is_set());
        let many = Attr::from_values(vec![Value::Iri(iri("a")), Value::Iri(iri("b"))]).unwrap();
        assert_eq!(many.len(), 2);
        assert!(Attr::from_values(Vec::new()).is_none());
    }

    #[test]
    fn test_builder_groups_by_predicate() {
        let mut builder = ExpandedEntity::builder(iri("synset-1"));
        builder
            .add(Predicate::outgoing(WN_HYPERNYM), Value::Iri(iri("synset-2")))
            .add(Predicate::outgoing(RDFS_LABEL), Literal::lang("hus", "da").into())
            .add(Predicate::outgoing(RDFS_LABEL), Literal::lang("house", "en").into())
            .add(Predicate::inverse(WN_HYPERNYM), Value::Iri(iri("synset-3")));
        let entity = builder.build();

        assert_eq!(entity.len(), 3);
        assert!(entity.get(&Predicate::outgoing(RDFS_LABEL)).unwrap().is_set());
        assert!(entity.get(&Predicate::inverse(WN_HYPERNYM)).is_some());

        let ids = entity.identifiers();
        assert!(ids.contains(&iri("synset-1")));
        assert!(ids.contains(&iri("synset-3")));
        assert!(ids.contains(&Iri::new(RDFS_LABEL)));
    }

    #[test]
    fn test_entity_json_round_trip() {
        let subject = iri("synset-1");
        let mut builder = ExpandedEntity::builder(subject.clone());
        builder
            .add(Predicate::outgoing(RDFS_LABEL), Literal::lang("hus", "da").into())
            .add(Predicate::outgoing(RDFS_LABEL), Literal::lang("house", "en").into())
            .add(
                Predicate::outgoing("https://wordnet.dk/dannet/schema/sentiment"),
                Value::Blank(BlankRef::new(
                    "b0",
                    subject.clone(),
                    Predicate::outgoing("https://wordnet.dk/dannet/schema/sentiment"),
                )),
            )
            .add(Predicate::inverse(WN_HYPERNYM), Value::Iri(iri("synset-3")));
        let mut labels = LabelMap::new();
        labels.insert(subject, Attr::One(Literal::lang("hus", "da").into()));
        let entity = builder.build().with_labels(labels);

        let json = serde_json::to_string(&entity).unwrap();
        let back: ExpandedEntity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entity);
    }
}
