//! Presentation grouping of entity attributes into titled sections

use crate::entity::{Attr, ExpandedEntity, Predicate, Value};
use crate::label::LabelSelector;
use crate::node::Literal;
use crate::prefix::PrefixRegistry;
use crate::vocab;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Boolean test over an attribute entry
pub type PredicateTest = Arc<dyn Fn(&Predicate, &Attr) -> bool + Send + Sync>;

/// Which attributes a section claims
#[derive(Clone)]
pub enum SectionSelector {
    /// Explicit list; entries keep this order
    Predicates(Vec<Predicate>),
    /// Test; entries are ordered by resolved label
    Test(PredicateTest),
}

impl SectionSelector {
    pub fn test<F>(f: F) -> Self
    where
        F: Fn(&Predicate, &Attr) -> bool + Send + Sync + 'static,
    {
        Self::Test(Arc::new(f))
    }

    fn matches(&self, predicate: &Predicate, attr: &Attr) -> bool {
        match self {
            Self::Predicates(list) => list.contains(predicate),
            Self::Test(test) => test(predicate, attr),
        }
    }
}

impl fmt::Debug for SectionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicates(list) => f.debug_tuple("Predicates").field(list).finish(),
            Self::Test(_) => f.write_str("Test(..)"),
        }
    }
}

/// Ordered (title-or-none, selector) pair
#[derive(Debug, Clone)]
pub struct SectionDescriptor {
    /// Language-tagged titles; `None` renders without a heading
    pub title: Option<Attr>,
    pub selector: SectionSelector,
}

impl SectionDescriptor {
    pub fn untitled(selector: SectionSelector) -> Self {
        Self {
            title: None,
            selector,
        }
    }

    /// Section titled with `(text, lang)` pairs
    pub fn titled(titles: &[(&str, &str)], selector: SectionSelector) -> Self {
        Self {
            title: title_attr(titles),
            selector,
        }
    }
}

fn title_attr(titles: &[(&str, &str)]) -> Option<Attr> {
    Attr::from_values(
        titles
            .iter()
            .map(|(text, lang)| Value::Literal(Literal::lang(*text, *lang))),
    )
}

/// Title of the implicit final section
pub fn other_title() -> Attr {
    Attr::from_values(vec![
        Value::Literal(Literal::lang("Other attributes", "en")),
        Value::Literal(Literal::lang("Andre egenskaber", "da")),
    ])
    .unwrap_or_else(|| Attr::One(Value::Literal(Literal::plain("Other attributes"))))
}

/// One grouped section of an entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub title: Option<Attr>,
    pub entries: Vec<(&'a Predicate, &'a Attr)>,
}

/// Partition an entity's attributes into sections.
///
/// Descriptors are evaluated in order and each predicate lands in the first
/// section that claims it. Empty sections are dropped; leftovers go to a final
/// "Other attributes" section.
pub fn group<'a>(
    entity: &'a ExpandedEntity,
    descriptors: &[SectionDescriptor],
    selector: &LabelSelector,
    registry: &PrefixRegistry,
) -> Vec<Section<'a>> {
    let mut claimed: BTreeSet<&Predicate> = BTreeSet::new();
    let mut sections = Vec::new();

    for descriptor in descriptors {
        let entries: Vec<(&Predicate, &Attr)> = match &descriptor.selector {
            SectionSelector::Predicates(list) => list
                .iter()
                .filter_map(|p| entity.attributes.get_key_value(p))
                .filter(|(p, _)| claimed.insert(*p))
                .collect(),
            SectionSelector::Test(_) => {
                let mut matched: Vec<(&Predicate, &Attr)> = entity
                    .attributes
                    .iter()
                    .filter(|(p, a)| !claimed.contains(p) && descriptor.selector.matches(p, a))
                    .collect();
                sort_by_label(&mut matched, entity, selector, registry);
                matched
            }
        };

        if entries.is_empty() {
            continue;
        }
        claimed.extend(entries.iter().map(|(p, _)| *p));
        sections.push(Section {
            title: descriptor.title.clone(),
            entries,
        });
    }

    let mut rest: Vec<(&Predicate, &Attr)> = entity
        .attributes
        .iter()
        .filter(|(p, _)| !claimed.contains(p))
        .collect();
    if !rest.is_empty() {
        sort_by_label(&mut rest, entity, selector, registry);
        sections.push(Section {
            title: Some(other_title()),
            entries: rest,
        });
    }

    sections
}

/// Resolved label of a predicate, falling back to its qname
pub fn predicate_label(
    predicate: &Predicate,
    entity: &ExpandedEntity,
    selector: &LabelSelector,
    registry: &PrefixRegistry,
) -> String {
    entity
        .label(&predicate.iri)
        .and_then(|attr| selector.display_text(attr))
        .unwrap_or_else(|| registry.qname(&predicate.iri))
}

fn sort_by_label(
    entries: &mut [(&Predicate, &Attr)],
    entity: &ExpandedEntity,
    selector: &LabelSelector,
    registry: &PrefixRegistry,
) {
    entries.sort_by_cached_key(|(p, _)| {
        (
            predicate_label(p, entity, selector, registry).to_lowercase(),
            (*p).clone(),
        )
    });
}

/// Default sections for lexical resources
pub fn default_sections() -> Vec<SectionDescriptor> {
    vec![
        SectionDescriptor::untitled(SectionSelector::Predicates(vec![
            Predicate::outgoing(vocab::RDF_TYPE),
            Predicate::outgoing(vocab::RDFS_LABEL),
            Predicate::outgoing(vocab::SKOS_PREF_LABEL),
            Predicate::outgoing(vocab::ONTOLEX_CANONICAL_FORM),
            Predicate::outgoing(vocab::ONTOLEX_WRITTEN_REP),
            Predicate::outgoing(vocab::WN_PART_OF_SPEECH),
        ])),
        SectionDescriptor::titled(
            &[("Description", "en"), ("Beskrivelse", "da")],
            SectionSelector::Predicates(vec![
                Predicate::outgoing(vocab::SKOS_DEFINITION),
                Predicate::outgoing(vocab::SKOS_EXAMPLE),
                Predicate::outgoing(vocab::RDFS_COMMENT),
                Predicate::outgoing(vocab::DNS_ONTOLOGICAL_TYPE),
                Predicate::outgoing(vocab::DNS_SENTIMENT),
            ]),
        ),
        SectionDescriptor::titled(
            &[("Lexical information", "en"), ("Leksikalsk information", "da")],
            SectionSelector::test(|p, _| !p.inverse && p.iri.as_str().starts_with(vocab::ONTOLEX)),
        ),
        SectionDescriptor::titled(
            &[("Semantic relations", "en"), ("Betydningsrelationer", "da")],
            SectionSelector::test(|p, attr| {
                !p.inverse
                    && p.iri.as_str().starts_with(vocab::WN)
                    && attr.iter().all(|v| v.as_iri().is_some())
            }),
        ),
        SectionDescriptor::titled(
            &[("Inverse relations", "en"), ("Omvendte relationer", "da")],
            SectionSelector::test(|p, _| p.inverse),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::LabelMap;
    use crate::node::Iri;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> Iri {
        Iri::new(format!("{EX}{local}"))
    }

    fn entity() -> ExpandedEntity {
        let mut builder = ExpandedEntity::builder(ex("s"));
        for local in ["zeta", "alpha", "mid"] {
            builder.add(Predicate::outgoing(ex(local)), Value::Iri(ex("o")));
        }
        builder.add(Predicate::inverse(ex("alpha")), Value::Iri(ex("other")));
        let mut labels = LabelMap::new();
        labels.insert(ex("zeta"), Attr::One(Literal::lang("Aardvark", "en").into()));
        builder.build().with_labels(labels)
    }

    fn registry() -> PrefixRegistry {
        PrefixRegistry::new(vec![crate::prefix::PrefixEntry::external("ex", EX)]).unwrap()
    }

    #[test]
    fn test_first_descriptor_wins() {
        let entity = entity();
        let selector = LabelSelector::new(["en"]);
        let descriptors = vec![
            SectionDescriptor::titled(
                &[("First", "en")],
                SectionSelector::Predicates(vec![Predicate::outgoing(ex("mid"))]),
            ),
            SectionDescriptor::titled(&[("Second", "en")], SectionSelector::test(|p, _| !p.inverse)),
        ];
        let sections = group(&entity, &descriptors, &selector, &registry());

        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].entries.len(), 1);
        assert_eq!(sections[0].entries[0].0, &Predicate::outgoing(ex("mid")));
        assert!(sections[1]
            .entries
            .iter()
            .all(|(p, _)| **p != Predicate::outgoing(ex("mid"))));
        // leftover inverse goes to the implicit section
        assert_eq!(sections[2].title, Some(other_title()));
        assert_eq!(sections[2].entries.len(), 1);
    }

    #[test]
    fn test_repeated_predicate_listed_once() {
        let entity = entity();
        let selector = LabelSelector::new(["en"]);
        let descriptors = vec![SectionDescriptor::untitled(SectionSelector::Predicates(vec![
            Predicate::outgoing(ex("mid")),
            Predicate::outgoing(ex("mid")),
        ]))];
        let sections = group(&entity, &descriptors, &selector, &registry());

        assert_eq!(sections[0].entries.len(), 1);
        let total: usize = sections.iter().map(|s| s.entries.len()).sum();
        assert_eq!(total, entity.len());
    }

    #[test]
    fn test_no_matches_goes_to_other() {
        let entity = entity();
        let selector = LabelSelector::new(["en"]);
        let descriptors = vec![SectionDescriptor::untitled(SectionSelector::Predicates(vec![
            Predicate::outgoing(ex("absent")),
        ]))];
        let sections = group(&entity, &descriptors, &selector, &registry());

        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, Some(other_title()));
        assert_eq!(sections[0].entries.len(), entity.len());
    }

    #[test]
    fn test_ordered_by_label_then_qname() {
        let entity = entity();
        let selector = LabelSelector::new(["en"]);
        let sections = group(&entity, &[], &selector, &registry());
        let order: Vec<String> = sections[0]
            .entries
            .iter()
            .map(|(p, _)| p.to_string())
            .collect();
        // "Aardvark" (labelled zeta) sorts before the qname-labelled entries
        assert_eq!(order[0], format!("{EX}zeta"));
        assert_eq!(order[1], format!("{EX}alpha"));
        assert_eq!(order[2], format!("^{EX}alpha"));
        assert_eq!(order[3], format!("{EX}mid"));
    }

    #[test]
    fn test_explicit_list_order_kept() {
        let entity = entity();
        let selector = LabelSelector::new(["en"]);
        let descriptors = vec![SectionDescriptor::untitled(SectionSelector::Predicates(vec![
            Predicate::outgoing(ex("zeta")),
            Predicate::outgoing(ex("alpha")),
        ]))];
        let sections = group(&entity, &descriptors, &selector, &registry());
        assert_eq!(sections[0].entries[0].0, &Predicate::outgoing(ex("zeta")));
        assert_eq!(sections[0].entries[1].0, &Predicate::outgoing(ex("alpha")));
        assert_eq!(sections[0].title, None);
    }
}
