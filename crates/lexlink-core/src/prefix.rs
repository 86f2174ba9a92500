//! Prefix registry: namespace prefixes, base identifiers, routes and schemas

use crate::error::{Error, Result};
use crate::node::Iri;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Static schema file offered for download under a prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDownload {
    /// Local file served as the download body
    pub file: PathBuf,

    /// Canonical source of the schema; its last path segment names the attachment
    pub source_url: String,

    #[serde(default = "default_schema_content_type")]
    pub content_type: String,
}

fn default_schema_content_type() -> String {
    "text/turtle".to_string()
}

impl SchemaDownload {
    pub fn new(file: impl Into<PathBuf>, source_url: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source_url: source_url.into(),
            content_type: default_schema_content_type(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn filename(&self) -> String {
        let from_url = self
            .source_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty() && !s.contains(':'));
        match from_url {
            Some(name) => name.to_string(),
            None => self
                .file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "schema".to_string()),
        }
    }
}

/// One registered namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixEntry {
    pub prefix: String,
    pub base: Iri,

    /// Route path for dataset-local prefixes; `None` for external vocabularies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDownload>,
}

impl PrefixEntry {
    pub fn external(prefix: impl Into<String>, base: impl Into<Iri>) -> Self {
        Self {
            prefix: prefix.into(),
            base: base.into(),
            route: None,
            schema: None,
        }
    }

    pub fn local(prefix: impl Into<String>, base: impl Into<Iri>, route: impl Into<String>) -> Self {
        Self {
            route: Some(route.into()),
            ..Self::external(prefix, base)
        }
    }

    pub fn with_schema(mut self, schema: SchemaDownload) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn is_local(&self) -> bool {
        self.route.is_some()
    }
}

#[derive(Deserialize)]
struct RegistryFile {
    #[serde(rename = "prefix")]
    prefixes: Vec<PrefixEntry>,
}

/// Prefix → base identifier table
#[derive(Debug, Clone)]
pub struct PrefixRegistry {
    entries: BTreeMap<String, PrefixEntry>,
    // (base, prefix), longest base first
    by_base: Vec<(String, String)>,
}

impl PrefixRegistry {
    /// Build a registry, normalizing route paths
    pub fn new(entries: impl IntoIterator<Item = PrefixEntry>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for mut entry in entries {
            if entry.prefix.is_empty() || entry.prefix.contains(':') {
                return Err(Error::InvalidPrefix(entry.prefix));
            }
            if entry.base.as_str().is_empty() {
                return Err(Error::InvalidIri(format!("empty base for prefix {}", entry.prefix)));
            }
            entry.route = entry.route.map(|r| normalize_route(&r));
            if map.contains_key(&entry.prefix) {
                return Err(Error::DuplicatePrefix(entry.prefix));
            }
            if let Some(route) = &entry.route {
                let taken = map
                    .values()
                    .any(|e: &PrefixEntry| e.route.as_ref() == Some(route));
                if taken {
                    return Err(Error::DuplicateRoute(route.clone()));
                }
            }
            map.insert(entry.prefix.clone(), entry);
        }

        let mut by_base: Vec<(String, String)> = map
            .values()
            .map(|e| (e.base.as_str().to_string(), e.prefix.clone()))
            .collect();
        by_base.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        tracing::debug!("Prefix registry built with {} entries", map.len());

        Ok(Self { entries: map, by_base })
    }

    /// Parse a TOML file of `[[prefix]]` tables
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let file: RegistryFile = toml::from_str(s)?;
        Self::new(file.prefixes)
    }

    /// The built-in registry for the DanNet dataset and its vocabularies
    pub fn dannet() -> Self {
        let entries = vec![
            PrefixEntry::local("dn", "https://wordnet.dk/dannet/data/", "/dannet/data"),
            PrefixEntry::local("dnc", "https://wordnet.dk/dannet/concepts/", "/dannet/concepts")
                .with_schema(SchemaDownload::new(
                    "schemas/dannet-concepts.ttl",
                    "https://wordnet.dk/dannet/concepts.ttl",
                )),
            PrefixEntry::local("dns", "https://wordnet.dk/dannet/schema/", "/dannet/schema")
                .with_schema(SchemaDownload::new(
                    "schemas/dannet-schema.ttl",
                    "https://wordnet.dk/dannet/schema.ttl",
                )),
            PrefixEntry::external("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
            PrefixEntry::external("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
            PrefixEntry::external("owl", "http://www.w3.org/2002/07/owl#"),
            PrefixEntry::external("xsd", "http://www.w3.org/2001/XMLSchema#"),
            PrefixEntry::external("skos", "http://www.w3.org/2004/02/skos/core#").with_schema(
                SchemaDownload::new(
                    "schemas/skos.rdf",
                    "http://www.w3.org/TR/skos-reference/skos.rdf",
                )
                .with_content_type("application/rdf+xml"),
            ),
            PrefixEntry::external("ontolex", "http://www.w3.org/ns/lemon/ontolex#").with_schema(
                SchemaDownload::new("schemas/ontolex.ttl", "http://www.w3.org/ns/lemon/ontolex.ttl"),
            ),
            PrefixEntry::external("lexinfo", "http://www.lexinfo.net/ontology/3.0/lexinfo#"),
            PrefixEntry::external("wn", "https://globalwordnet.github.io/schemas/wn#").with_schema(
                SchemaDownload::new(
                    "schemas/wn.ttl",
                    "https://globalwordnet.github.io/schemas/wn.ttl",
                ),
            ),
            PrefixEntry::external("ili", "http://ili.globalwordnet.org/ili/"),
            PrefixEntry::external("dc", "http://purl.org/dc/terms/"),
            PrefixEntry::external("marl", "http://www.gsi.upm.es/ontologies/marl/ns#"),
        ];
        // Safe: the built-in table has unique, non-empty prefixes
        Self::new(entries).expect("built-in prefix table is valid")
    }

    pub fn get(&self, prefix: &str) -> Option<&PrefixEntry> {
        self.entries.get(prefix)
    }

    pub fn entries(&self) -> impl Iterator<Item = &PrefixEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-qualify a local name under a registered prefix
    pub fn qualify(&self, prefix: &str, local: &str) -> Result<Iri> {
        let entry = self
            .get(prefix)
            .ok_or_else(|| Error::UnknownPrefix(prefix.to_string()))?;
        Ok(Iri::new(format!("{}{}", entry.base, local)))
    }

    /// Split an identifier into its registered entry and local name (longest base wins)
    pub fn split<'a>(&'a self, iri: &'a Iri) -> Option<(&'a PrefixEntry, &'a str)> {
        self.by_base.iter().find_map(|(base, prefix)| {
            iri.as_str()
                .strip_prefix(base.as_str())
                .and_then(|local| self.entries.get(prefix).map(|entry| (entry, local)))
        })
    }

    /// `prefix:local`, or `<iri>` when no prefix matches
    pub fn qname(&self, iri: &Iri) -> String {
        match self.split(iri) {
            Some((entry, local)) => format!("{}:{}", entry.prefix, local),
            None => format!("<{}>", iri),
        }
    }

    pub fn local_name<'a>(&'a self, iri: &'a Iri) -> &'a str {
        if let Some((_, local)) = self.split(iri) {
            return local;
        }
        let s = iri.as_str();
        s.rsplit(['#', '/']).find(|part| !part.is_empty()).unwrap_or(s)
    }

    /// prefix → base, for JSON-LD contexts and Turtle headers
    pub fn context(&self) -> BTreeMap<String, String> {
        self.entries
            .values()
            .map(|e| (e.prefix.clone(), e.base.as_str().to_string()))
            .collect()
    }
}

impl Default for PrefixRegistry {
    fn default() -> Self {
        Self::dannet()
    }
}

/// Leading separator, no trailing separator; the root route normalizes to ""
pub fn normalize_route(route: &str) -> String {
    let trimmed = route.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
