//! Route table and path ↔ subject mapping

use lexlink_core::prefix::normalize_route;
use lexlink_core::{Iri, PrefixRegistry, SchemaDownload};
use thiserror::Error;

/// Why a request path could not be turned into a subject
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PathError {
    #[error("unknown prefix '{0}'")]
    UnknownPrefix(String),

    #[error("local name is not valid UTF-8 after decoding: {0}")]
    BadEncoding(String),

    #[error("empty local name")]
    EmptyLocalName,
}

/// What a mounted route serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    /// Resources under one dataset-local prefix
    Resource { prefix: String },
    /// Resources under any registered prefix, named in the path
    External,
    /// Static schema file for one prefix
    Schema { prefix: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    pub path: String,
    pub kind: RouteKind,
}

/// Built once at startup from the prefix registry
#[derive(Debug, Clone)]
pub struct RouteResolver {
    registry: PrefixRegistry,
    external_path: String,
    schema_path: String,
}

impl RouteResolver {
    pub fn new(registry: &PrefixRegistry, external_path: &str, schema_path: &str) -> Self {
        Self {
            registry: registry.clone(),
            external_path: normalize_route(external_path),
            schema_path: normalize_route(schema_path),
        }
    }

    pub fn registry(&self) -> &PrefixRegistry {
        &self.registry
    }

    pub fn external_path(&self) -> &str {
        &self.external_path
    }

    /// Every route to mount, in axum path syntax
    pub fn route_table(&self) -> Vec<RouteSpec> {
        let mut table: Vec<RouteSpec> = self
            .registry
            .entries()
            .filter_map(|entry| {
                entry.route.as_ref().map(|route| RouteSpec {
                    path: format!("{}/:subject", route),
                    kind: RouteKind::Resource {
                        prefix: entry.prefix.clone(),
                    },
                })
            })
            .collect();

        table.push(RouteSpec {
            path: format!("{}/:prefix/:subject", self.external_path),
            kind: RouteKind::External,
        });

        table.extend(self.registry.entries().filter(|e| e.schema.is_some()).map(|entry| {
            RouteSpec {
                path: format!("{}/{}", self.schema_path, entry.prefix),
                kind: RouteKind::Schema {
                    prefix: entry.prefix.clone(),
                },
            }
        }));

        table
    }

    /// Decode a raw local-name segment and qualify it under `prefix`
    pub fn resolve(&self, prefix: &str, raw_local: &str) -> Result<Iri, PathError> {
        let local = urlencoding::decode(raw_local)
            .map_err(|_| PathError::BadEncoding(raw_local.to_string()))?;
        if local.is_empty() {
            return Err(PathError::EmptyLocalName);
        }
        self.registry
            .qualify(prefix, &local)
            .map_err(|_| PathError::UnknownPrefix(prefix.to_string()))
    }

    /// Link target for an identifier.
    ///
    /// Dataset-local identifiers link to their own route, other registered
    /// ones to the external route; anything else links to itself.
    pub fn resolve_href(&self, iri: &Iri) -> String {
        match self.registry.split(iri) {
            Some((entry, local)) if !local.is_empty() => {
                let encoded = urlencoding::encode(local);
                match &entry.route {
                    Some(route) => format!("{}/{}", route, encoded),
                    None => format!("{}/{}/{}", self.external_path, entry.prefix, encoded),
                }
            }
            _ => iri.to_string(),
        }
    }

    pub fn schema(&self, prefix: &str) -> Option<&SchemaDownload> {
        self.registry.get(prefix).and_then(|e| e.schema.as_ref())
    }
}
