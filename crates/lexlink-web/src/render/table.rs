//! Flat two-column table

use lexlink_core::{Attr, ExpandedEntity, Literal, PrefixRegistry, Predicate, Value};

/// `qname` for outgoing keys, `^qname` for inverse ones
pub fn predicate_qname(predicate: &Predicate, registry: &PrefixRegistry) -> String {
    let qname = registry.qname(&predicate.iri);
    if predicate.inverse {
        format!("^{}", qname)
    } else {
        qname
    }
}

pub fn literal_string(lit: &Literal, registry: &PrefixRegistry) -> String {
    match (&lit.lang, &lit.datatype) {
        (None, Some(dt)) => format!("{}^^{}", lit.quoted(), registry.qname(dt)),
        _ => lit.quoted(),
    }
}

pub fn value_string(value: &Value, registry: &PrefixRegistry) -> String {
    match value {
        Value::Iri(iri) => registry.qname(iri),
        Value::Blank(blank) => format!("_:{}", blank.local_id),
        Value::Literal(lit) => literal_string(lit, registry),
    }
}

fn attr_string(attr: &Attr, registry: &PrefixRegistry) -> String {
    match attr {
        Attr::One(value) => value_string(value, registry),
        Attr::Many(values) => {
            let first = values
                .iter()
                .map(|v| value_string(v, registry))
                .min()
                .unwrap_or_default();
            format!("{{ {} , ... }}", first)
        }
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

/// Two columns, rows sorted by predicate qname
pub fn render(entity: &ExpandedEntity, registry: &PrefixRegistry) -> String {
    let mut rows: Vec<(String, String)> = entity
        .attributes
        .iter()
        .map(|(p, a)| (predicate_qname(p, registry), attr_string(a, registry)))
        .collect();
    rows.sort();

    let headers = ("predicate", "object");
    let left = rows
        .iter()
        .map(|(p, _)| p.chars().count())
        .chain([headers.0.len()])
        .max()
        .unwrap_or(0);
    let right = rows
        .iter()
        .map(|(_, o)| o.chars().count())
        .chain([headers.1.len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("| {} | {} |\n", pad(headers.0, left), pad(headers.1, right)));
    out.push_str(&format!("|-{}-+-{}-|\n", "-".repeat(left), "-".repeat(right)));
    for (p, o) in &rows {
        out.push_str(&format!("| {} | {} |\n", pad(p, left), pad(o, right)));
    }
    out
}
