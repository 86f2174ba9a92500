//! Structural dump (JSON) and interchange serialization (MessagePack)

use super::RenderError;
use lexlink_core::ExpandedEntity;

pub fn dump(entity: &ExpandedEntity) -> Result<Vec<u8>, RenderError> {
    Ok(serde_json::to_vec(entity)?)
}

pub fn load(bytes: &[u8]) -> Result<ExpandedEntity, RenderError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// MessagePack with named fields, so the layout matches the JSON dump
pub fn interchange(entity: &ExpandedEntity) -> Result<Vec<u8>, RenderError> {
    Ok(rmp_serde::to_vec_named(entity)?)
}

pub fn load_interchange(bytes: &[u8]) -> Result<ExpandedEntity, RenderError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lexlink_core::{Attr, BlankRef, Iri, LabelMap, Literal, Predicate, Value};

    fn entity() -> ExpandedEntity {
        let subject = Iri::new("https://wordnet.dk/dannet/data/synset-1");
        let sentiment = Predicate::outgoing("https://wordnet.dk/dannet/schema/sentiment");
        let mut builder = ExpandedEntity::builder(subject.clone());
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
                sentiment.clone(),
                Value::Blank(BlankRef::new("b7", subject.clone(), sentiment)),
            )
            .add(
                Predicate::inverse("https://globalwordnet.github.io/schemas/wn#hypernym"),
                Value::Iri(Iri::new("https://wordnet.dk/dannet/data/synset-9")),
            );
        let mut labels = LabelMap::new();
        labels.insert(subject, Attr::One(Literal::lang("hus", "da").into()));
        builder.build().with_labels(labels)
    }

    #[test]
    fn test_dump_decodes_to_equal_entity() {
        let entity = entity();
        assert_eq!(load(&dump(&entity).unwrap()).unwrap(), entity);
    }

    #[test]
    fn test_interchange_keeps_tags_and_blanks() {
        let entity = entity();
        let back = load_interchange(&interchange(&entity).unwrap()).unwrap();
        assert_eq!(back, entity);
        assert_eq!(back.blank_refs()[0].local_id, "b7");
    }
}
