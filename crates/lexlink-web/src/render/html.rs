//! Document representation

use super::table::predicate_qname;
use super::{RenderContext, RenderError};
use lexlink_core::section::{group, predicate_label};
use lexlink_core::{Attr, ExpandedEntity, Iri, Literal, Predicate, Selected, Value};
use std::fmt::Write;

/// Sets larger than this collapse into a `<details>` element
const INLINE_LIST_MAX: usize = 5;

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn prefix_badge(iri: &Iri, ctx: &RenderContext<'_>) -> String {
    match ctx.registry.split(iri) {
        Some((entry, _)) => format!(
            "<span class=\"prefix prefix-{0}\" title=\"{1}\">{0}</span>",
            escape(&entry.prefix),
            escape(entry.base.as_str())
        ),
        None => "<span class=\"prefix prefix-none\"></span>".to_string(),
    }
}

/// Label of `iri` in any language, preferred first, else its local name
fn label_text(iri: &Iri, source: &ExpandedEntity, ctx: &RenderContext<'_>) -> String {
    source
        .label(iri)
        .and_then(|attr| ctx.selector.display_text(attr))
        .unwrap_or_else(|| ctx.registry.local_name(iri).to_string())
}

fn literal_html(lit: &Literal, ctx: &RenderContext<'_>) -> String {
    match (&lit.lang, &lit.datatype) {
        (Some(lang), _) => format!("<span lang=\"{}\">{}</span>", escape(lang), escape(&lit.value)),
        (None, Some(dt)) => format!(
            "<span class=\"typed\" title=\"{}\">{}</span>",
            escape(&ctx.registry.qname(dt)),
            escape(&lit.value)
        ),
        (None, None) => format!("<span>{}</span>", escape(&lit.value)),
    }
}

fn link_html(iri: &Iri, source: &ExpandedEntity, ctx: &RenderContext<'_>) -> String {
    format!(
        "<a href=\"{}\" title=\"{}\">{}</a>",
        escape(&ctx.routes.resolve_href(iri)),
        escape(&ctx.registry.qname(iri)),
        escape(&label_text(iri, source, ctx))
    )
}

fn list_html(class: &str, items: &[String]) -> String {
    let mut out = format!("<ul class=\"{}\">", class);
    for item in items {
        out.push_str("<li>");
        out.push_str(item);
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

fn value_html(
    value: &Value,
    source: &ExpandedEntity,
    ctx: &RenderContext<'_>,
    depth: usize,
) -> Result<String, RenderError> {
    match value {
        Value::Iri(iri) => Ok(link_html(iri, source, ctx)),
        Value::Literal(lit) => Ok(literal_html(lit, ctx)),
        Value::Blank(blank) => match ctx.blanks.get(blank) {
            Some(entity) if depth == 0 => blank_table(entity, ctx),
            _ => Ok("<span class=\"blank\">[…]</span>".to_string()),
        },
    }
}

fn attr_html(
    attr: &Attr,
    source: &ExpandedEntity,
    ctx: &RenderContext<'_>,
    depth: usize,
) -> Result<String, RenderError> {
    let values = match attr {
        Attr::One(value) => return value_html(value, source, ctx, depth),
        Attr::Many(values) => values,
    };

    if values.iter().all(Value::is_lang_literal) {
        match ctx.selector.select_all(attr) {
            Some(Selected::One(lit)) => return Ok(literal_html(&lit, ctx)),
            Some(Selected::Many(lits)) => {
                let items: Vec<String> = lits.iter().map(|l| literal_html(l, ctx)).collect();
                return Ok(list_html("lang-strings", &items));
            }
            // nothing in a preferred language; show everything
            _ => {}
        }
    }

    let items = values
        .iter()
        .map(|v| value_html(v, source, ctx, depth))
        .collect::<Result<Vec<_>, _>>()?;
    let list = list_html("values", &items);
    if items.len() <= INLINE_LIST_MAX {
        Ok(list)
    } else {
        Ok(format!(
            "<details><summary>{} values</summary>{}</details>",
            items.len(),
            list
        ))
    }
}

fn row_html(
    out: &mut String,
    predicate: &Predicate,
    attr: &Attr,
    source: &ExpandedEntity,
    ctx: &RenderContext<'_>,
    depth: usize,
) -> Result<(), RenderError> {
    let class = if predicate.inverse { " class=\"inverse\"" } else { "" };
    let label = predicate_label(predicate, source, ctx.selector, ctx.registry);
    write!(
        out,
        "<tr{}><td>{}</td><th><a href=\"{}\" title=\"{}\">{}</a></th><td>{}</td></tr>",
        class,
        prefix_badge(&predicate.iri, ctx),
        escape(&ctx.routes.resolve_href(&predicate.iri)),
        escape(&predicate_qname(predicate, ctx.registry)),
        escape(&label),
        attr_html(attr, source, ctx, depth)?
    )?;
    Ok(())
}

/// Inlined blank entity: same row builder, no section grouping
fn blank_table(entity: &ExpandedEntity, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let mut out = String::from("<table class=\"blank\"><tbody>");
    for section in group(entity, &[], ctx.selector, ctx.registry) {
        for (predicate, attr) in section.entries {
            row_html(&mut out, predicate, attr, entity, ctx, 1)?;
        }
    }
    out.push_str("</tbody></table>");
    Ok(out)
}

/// Full document for `entity`; identical input gives identical bytes
pub fn render(entity: &ExpandedEntity, ctx: &RenderContext<'_>) -> Result<String, RenderError> {
    let lang = ctx
        .selector
        .preferences()
        .first()
        .map(String::as_str)
        .unwrap_or("en");
    let title = label_text(&entity.subject, entity, ctx);

    let mut out = String::new();
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"{}\">", escape(lang))?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{}</title>", escape(&title))?;
    if let Some(stylesheet) = &ctx.assets.stylesheet {
        writeln!(out, "<link rel=\"stylesheet\" href=\"{}\">", escape(stylesheet))?;
    }
    if let Some(script) = &ctx.assets.script {
        writeln!(out, "<script src=\"{}\" defer></script>", escape(script))?;
    }
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(
        out,
        "<article class=\"entity\" data-subject=\"{}\">",
        escape(entity.subject.as_str())
    )?;
    writeln!(
        out,
        "<header>{}<h1>{}</h1></header>",
        prefix_badge(&entity.subject, ctx),
        escape(&title)
    )?;

    for section in group(entity, ctx.sections, ctx.selector, ctx.registry) {
        writeln!(out, "<section>")?;
        if let Some(text) = section.title.as_ref().and_then(|t| ctx.selector.display_text(t)) {
            writeln!(out, "<h2>{}</h2>", escape(&text))?;
        }
        out.push_str("<table class=\"attributes\"><tbody>\n");
        for (predicate, attr) in section.entries {
            row_html(&mut out, predicate, attr, entity, ctx, 0)?;
            out.push('\n');
        }
        writeln!(out, "</tbody></table>")?;
        writeln!(out, "</section>")?;
    }

    writeln!(out, "</article>")?;
    // client-side hand-off; "</" must not close the script element early
    let data = serde_json::to_string(entity)?.replace("</", "<\\/");
    writeln!(
        out,
        "<script id=\"entity-data\" type=\"application/json\">{}</script>",
        data
    )?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}
