//! Representation renderers
//!
//! Every renderer is a pure function of the entity and the render context;
//! all store access has already happened by the time one runs.

pub mod html;
pub mod json;
pub mod jsonld;
pub mod table;
pub mod turtle;

use crate::negotiate::ContentType;
use crate::routes::RouteResolver;
use crate::state::Assets;
use lexlink_core::{BlankRef, ExpandedEntity, LabelSelector, PrefixRegistry, SectionDescriptor};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack encoding failed: {0}")]
    MsgPack(#[from] rmp_serde::encode::Error),

    #[error("MessagePack decoding failed: {0}")]
    MsgPackDecode(#[from] rmp_serde::decode::Error),

    #[error("Formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Everything a renderer may consult besides the entity itself
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub registry: &'a PrefixRegistry,
    pub selector: &'a LabelSelector,
    pub routes: &'a RouteResolver,
    pub sections: &'a [SectionDescriptor],
    pub assets: &'a Assets,
    /// Pre-resolved one-hop blank entities
    pub blanks: &'a BTreeMap<BlankRef, ExpandedEntity>,
}

/// Render `entity` as `content_type`
pub fn render(
    content_type: ContentType,
    entity: &ExpandedEntity,
    ctx: &RenderContext<'_>,
) -> Result<Vec<u8>, RenderError> {
    match content_type {
        ContentType::Json => json::dump(entity),
        ContentType::MsgPack => json::interchange(entity),
        ContentType::Table => Ok(table::render(entity, ctx.registry).into_bytes()),
        ContentType::Html => Ok(html::render(entity, ctx)?.into_bytes()),
        ContentType::JsonLd => jsonld::render(entity, ctx),
        ContentType::Turtle => Ok(turtle::render(entity, ctx)?.into_bytes()),
    }
}
