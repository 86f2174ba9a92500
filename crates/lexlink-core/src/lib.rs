//! Lexlink Core - Data model for the linked-data resource server
//!
//! This crate provides the RDF term types, the expanded-entity model, the
//! prefix registry and the presentation helpers (label selection and
//! section grouping) shared by the storage and web crates.

pub mod entity;
pub mod error;
pub mod label;
pub mod node;
pub mod prefix;
pub mod section;
pub mod vocab;

pub use entity::{Attr, BlankRef, EntityBuilder, ExpandedEntity, LabelMap, Predicate, Value};
pub use error::{Error, Result};
pub use label::{LabelSelector, Selected};
pub use node::{Iri, Literal, Node, Triple};
pub use prefix::{PrefixEntry, PrefixRegistry, SchemaDownload};
pub use section::{default_sections, group, predicate_label, Section, SectionDescriptor, SectionSelector};
