//! RDF term types: identifiers, literals, nodes and triples

use serde::{Deserialize, Serialize};
use std::fmt;

/// Absolute resource identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Iri(String);

impl Iri {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Iri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A literal value: plain, language-tagged or datatyped
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<Iri>,
}

impl Literal {
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: None,
            datatype: None,
        }
    }

    pub fn lang(value: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            lang: Some(lang.into()),
            datatype: None,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<Iri>) -> Self {
        Self {
            value: value.into(),
            lang: None,
            datatype: Some(datatype.into()),
        }
    }

    pub fn is_lang_tagged(&self) -> bool {
        self.lang.is_some()
    }

    /// Quoted form without datatype, e.g. `"hus"@da`
    pub fn quoted(&self) -> String {
        let mut out = format!("\"{}\"", escape_literal(&self.value));
        if let Some(lang) = &self.lang {
            out.push('@');
            out.push_str(lang);
        }
        out
    }
}

/// String form used for display and sorting: `"text"`, `"text"@lang` or `"text"^^<dt>`
impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())?;
        if let (None, Some(dt)) = (&self.lang, &self.datatype) {
            write!(f, "^^<{}>", dt)?;
        }
        Ok(())
    }
}

/// Any node of the graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Iri(Iri),
    Blank(String),
    Literal(Literal),
}

impl Node {
    pub fn iri(s: impl Into<String>) -> Self {
        Self::Iri(Iri::new(s))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Self::Blank(id.into())
    }

    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// N-Triples term form; also used as the storage key of the node
    pub fn to_ntriples(&self) -> String {
        match self {
            Self::Iri(iri) => format!("<{}>", iri),
            Self::Blank(id) => format!("_:{}", id),
            Self::Literal(lit) => lit.to_string(),
        }
    }
}

impl From<Iri> for Node {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

/// An atomic fact
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Iri,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: impl Into<Node>, predicate: impl Into<Iri>, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }

    pub fn matches(&self, subject: Option<&Node>, predicate: Option<&Iri>, object: Option<&Node>) -> bool {
        subject.map_or(true, |s| &self.subject == s)
            && predicate.map_or(true, |p| &self.predicate == p)
            && object.map_or(true, |o| &self.object == o)
    }
}

/// Escape a literal for N-Triples/Turtle output.
///
/// Control characters are written as `\uXXXX`, so the result never contains
/// the separator byte used by the redb key layout.
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_forms() {
        assert_eq!(Literal::plain("kage").to_string(), "\"kage\"");
        assert_eq!(Literal::lang("hus", "da").to_string(), "\"hus\"@da");
        assert_eq!(
            Literal::typed("3", "http://www.w3.org/2001/XMLSchema#integer").to_string(),
            "\"3\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_ntriples_escaping() {
        let node = Node::Literal(Literal::plain("a \"b\"\n\u{1f}"));
        assert_eq!(node.to_ntriples(), "\"a \\\"b\\\"\\n\\u001F\"");
        assert_eq!(Node::blank("b0").to_ntriples(), "_:b0");
        assert_eq!(Node::iri("http://x/a").to_ntriples(), "<http://x/a>");
    }

    #[test]
    fn test_triple_matches() {
        let t = Triple::new(Iri::new("http://x/s"), "http://x/p", Literal::plain("o"));
        assert!(t.matches(Some(&Node::iri("http://x/s")), None, None));
        assert!(t.matches(None, Some(&Iri::new("http://x/p")), None));
        assert!(!t.matches(None, None, Some(&Node::iri("http://x/o"))));
    }

    #[test]
    fn test_node_json_shape() {
        let json = serde_json::to_string(&Node::iri("http://x/a")).unwrap();
        assert_eq!(json, r#"{"iri":"http://x/a"}"#);
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Node::iri("http://x/a"));
    }
}
