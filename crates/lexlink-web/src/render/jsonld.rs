//! JSON-LD representation

use super::{RenderContext, RenderError};
use lexlink_core::{Attr, ExpandedEntity, Iri, PrefixRegistry, Value};
use serde_json::{json, Map, Value as Json};

fn compact(iri: &Iri, registry: &PrefixRegistry) -> String {
    match registry.split(iri) {
        Some((entry, local)) => format!("{}:{}", entry.prefix, local),
        None => iri.to_string(),
    }
}

fn value_json(value: &Value, registry: &PrefixRegistry) -> Json {
    match value {
        Value::Iri(iri) => json!({ "@id": compact(iri, registry) }),
        Value::Blank(blank) => json!({ "@id": format!("_:{}", blank.local_id) }),
        Value::Literal(lit) => match (&lit.lang, &lit.datatype) {
            (Some(lang), _) => json!({ "@value": lit.value, "@language": lang }),
            (None, Some(dt)) => json!({ "@value": lit.value, "@type": compact(dt, registry) }),
            (None, None) => Json::String(lit.value.clone()),
        },
    }
}

fn attr_json(attr: &Attr, registry: &PrefixRegistry) -> Json {
    match attr {
        Attr::One(value) => value_json(value, registry),
        Attr::Many(values) => json!({
            "@set": values.iter().map(|v| value_json(v, registry)).collect::<Vec<_>>()
        }),
    }
}

pub fn render(entity: &ExpandedEntity, ctx: &RenderContext<'_>) -> Result<Vec<u8>, RenderError> {
    let registry = ctx.registry;

    let mut doc = Map::new();
    doc.insert("@context".to_string(), serde_json::to_value(registry.context())?);
    doc.insert("@id".to_string(), Json::String(compact(&entity.subject, registry)));

    let mut reverse = Map::new();
    for (predicate, attr) in &entity.attributes {
        let key = compact(&predicate.iri, registry);
        let value = attr_json(attr, registry);
        if predicate.inverse {
            reverse.insert(key, value);
        } else {
            doc.insert(key, value);
        }
    }
    if !reverse.is_empty() {
        doc.insert("@reverse".to_string(), Json::Object(reverse));
    }

    Ok(serde_json::to_vec_pretty(&Json::Object(doc))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::RouteResolver;
    use crate::state::Assets;
    use lexlink_core::{LabelSelector, Literal, Predicate};
    use std::collections::BTreeMap;

    #[test]
    fn test_jsonld_document() {
        let registry = PrefixRegistry::dannet();
        let selector = LabelSelector::new(["da"]);
        let routes = RouteResolver::new(&registry, "/dannet/external", "/schema");
        let assets = Assets::default();
        let blanks = BTreeMap::new();
        let ctx = RenderContext {
            registry: &registry,
            selector: &selector,
            routes: &routes,
            sections: &[],
            assets: &assets,
            blanks: &blanks,
        };

        let mut builder = ExpandedEntity::builder(Iri::new("https://wordnet.dk/dannet/data/synset-1"));
        builder
            .add(
                Predicate::outgoing("http://www.w3.org/2000/01/rdf-schema#label"),
                Literal::lang("hus", "da").into(),
            )
            .add(
                Predicate::outgoing("http://www.w3.org/2000/01/rdf-schema#label"),
                Literal::lang("house", "en").into(),
            )
            .add(
                Predicate::inverse("https://globalwordnet.github.io/schemas/wn#hypernym"),
                Value::Iri(Iri::new("https://wordnet.dk/dannet/data/synset-3")),
            );
        let bytes = render(&builder.build(), &ctx).unwrap();
        let doc: Json = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(doc["@id"], "dn:synset-1");
        assert_eq!(doc["@context"]["dn"], "https://wordnet.dk/dannet/data/");
        assert_eq!(doc["rdfs:label"]["@set"].as_array().unwrap().len(), 2);
        assert_eq!(doc["@reverse"]["wn:hypernym"]["@id"], "dn:synset-3");
    }
}
