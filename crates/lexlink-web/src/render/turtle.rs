//! Turtle representation

use super::{RenderContext, RenderError};
use lexlink_core::{Attr, ExpandedEntity, Iri, Literal, PrefixRegistry, Value};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Collects the prefixes actually used while writing terms
struct Terms<'a> {
    registry: &'a PrefixRegistry,
    used: BTreeSet<String>,
}

fn is_pn_local(local: &str) -> bool {
    !local.is_empty()
        && !local.ends_with('.')
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn blank_label(local_id: &str) -> String {
    let id: String = local_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("_:b{}", id)
}

impl<'a> Terms<'a> {
    fn new(registry: &'a PrefixRegistry) -> Self {
        Self {
            registry,
            used: BTreeSet::new(),
        }
    }

    fn iri(&mut self, iri: &Iri) -> String {
        if let Some((entry, local)) = self.registry.split(iri) {
            if is_pn_local(local) {
                self.used.insert(entry.prefix.clone());
                return format!("{}:{}", entry.prefix, local);
            }
        }
        format!("<{}>", iri)
    }

    fn literal(&mut self, lit: &Literal) -> String {
        match (&lit.lang, &lit.datatype) {
            (None, Some(dt)) => format!("{}^^{}", lit.quoted(), self.iri(dt)),
            _ => lit.quoted(),
        }
    }

    fn value(&mut self, value: &Value, ctx: &RenderContext<'_>, depth: usize) -> String {
        match value {
            Value::Iri(iri) => self.iri(iri),
            Value::Literal(lit) => self.literal(lit),
            Value::Blank(blank) => match ctx.blanks.get(blank) {
                Some(entity) if depth == 0 => self.blank_block(entity, ctx),
                _ => blank_label(&blank.local_id),
            },
        }
    }

    fn objects(&mut self, attr: &Attr, ctx: &RenderContext<'_>, depth: usize) -> String {
        attr.iter()
            .map(|v| self.value(v, ctx, depth))
            .collect::<Vec<_>>()
            .join(" , ")
    }

    /// `[ p o ; ... ]` for a pre-resolved blank entity
    fn blank_block(&mut self, entity: &ExpandedEntity, ctx: &RenderContext<'_>) -> String {
        let parts: Vec<String> = entity
            .attributes
            .iter()
            .filter(|(p, _)| !p.inverse)
            .map(|(p, attr)| format!("{} {}", self.iri(&p.iri), self.objects(attr, ctx, 1)))
            .collect();
        if parts.is_empty() {
            "[]".to_string()
        } else {
            format!("[ {} ]", parts.join(" ; "))
        }
    }
}

/// Outgoing facts as one subject block, inverse facts as separate statements
pub fn render(entity: &ExpandedEntity, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let mut terms = Terms::new(ctx.registry);
    let subject = terms.iri(&entity.subject);

    let outgoing: Vec<String> = entity
        .attributes
        .iter()
        .filter(|(p, _)| !p.inverse)
        .map(|(p, attr)| format!("    {} {}", terms.iri(&p.iri), terms.objects(attr, ctx, 0)))
        .collect();

    let mut incoming = Vec::new();
    for (p, attr) in entity.attributes.iter().filter(|(p, _)| p.inverse) {
        let predicate = terms.iri(&p.iri);
        for value in attr.iter() {
            let source = match value {
                // a blank subject can only be written as a label here
                Value::Blank(blank) => blank_label(&blank.local_id),
                other => terms.value(other, ctx, 1),
            };
            incoming.push(format!("{} {} {} .", source, predicate, subject));
        }
    }

    let mut out = String::new();
    let context = ctx.registry.context();
    for prefix in &terms.used {
        if let Some(base) = context.get(prefix) {
            writeln!(out, "@prefix {}: <{}> .", prefix, base)?;
        }
    }
    if !terms.used.is_empty() {
        out.push('\n');
    }

    if !outgoing.is_empty() {
        writeln!(out, "{}", subject)?;
        writeln!(out, "{} .", outgoing.join(" ;\n"))?;
    }
    if !incoming.is_empty() {
        if !outgoing.is_empty() {
            out.push('\n');
        }
        for statement in incoming {
            writeln!(out, "{}", statement)?;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteResolver;
    use crate::state::Assets;
    use lexlink_core::{BlankRef, LabelSelector, Predicate};
    use std::collections::BTreeMap;

    const SENTIMENT: &str = "https://wordnet.dk/dannet/schema/sentiment";

    #[test]
    fn test_turtle_document() {
        let registry = PrefixRegistry::dannet();
        let selector = LabelSelector::new(["da"]);
        let routes = RouteResolver::new(&registry, "/dannet/external", "/schema");
        let assets = Assets::default();

        let subject = Iri::new("https://wordnet.dk/dannet/data/synset-1");
        let blank = BlankRef::new("s1", subject.clone(), Predicate::outgoing(SENTIMENT));
        let mut blank_builder = ExpandedEntity::builder(subject.clone());
        blank_builder.add(
            Predicate::outgoing("http://www.gsi.upm.es/ontologies/marl/ns#hasPolarity"),
            Literal::plain("positive").into(),
        );
        let mut blanks = BTreeMap::new();
        blanks.insert(blank.clone(), blank_builder.build());

        let ctx = RenderContext {
            registry: &registry,
            selector: &selector,
            routes: &routes,
            sections: &[],
            assets: &assets,
            blanks: &blanks,
        };

        let mut builder = ExpandedEntity::builder(subject);
        builder
            .add(
                Predicate::outgoing("http://www.w3.org/2000/01/rdf-schema#label"),
                Literal::lang("hus", "da").into(),
            )
            .add(Predicate::outgoing(SENTIMENT), Value::Blank(blank))
            .add(
                Predicate::inverse("https://globalwordnet.github.io/schemas/wn#hypernym"),
                Value::Iri(Iri::new("https://wordnet.dk/dannet/data/synset-3")),
            );
        let ttl = render(&builder.build(), &ctx).unwrap();

        assert!(ttl.contains("@prefix dn: <https://wordnet.dk/dannet/data/> ."));
        assert!(ttl.contains("@prefix marl: <http://www.gsi.upm.es/ontologies/marl/ns#> ."));
        assert!(!ttl.contains("@prefix owl:"));
        assert!(ttl.contains("dn:synset-1\n    rdfs:label \"hus\"@da ;\n"));
        assert!(ttl.contains("dns:sentiment [ marl:hasPolarity \"positive\" ] ."));
        assert!(ttl.contains("dn:synset-3 wn:hypernym dn:synset-1 ."));
    }
}
