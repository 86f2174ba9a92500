//! Well-known vocabulary identifiers

pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";
pub const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";
pub const SKOS_EXAMPLE: &str = "http://www.w3.org/2004/02/skos/core#example";

pub const ONTOLEX: &str = "http://www.w3.org/ns/lemon/ontolex#";
pub const ONTOLEX_CANONICAL_FORM: &str = "http://www.w3.org/ns/lemon/ontolex#canonicalForm";
pub const ONTOLEX_WRITTEN_REP: &str = "http://www.w3.org/ns/lemon/ontolex#writtenRep";

pub const WN: &str = "https://globalwordnet.github.io/schemas/wn#";
pub const WN_PART_OF_SPEECH: &str = "https://globalwordnet.github.io/schemas/wn#partOfSpeech";

pub const DNS_ONTOLOGICAL_TYPE: &str = "https://wordnet.dk/dannet/schema/ontologicalType";
pub const DNS_SENTIMENT: &str = "https://wordnet.dk/dannet/schema/sentiment";

/// Label predicates in priority order
pub const LABEL_PREDICATES: [&str; 2] = [RDFS_LABEL, SKOS_PREF_LABEL];
