//! Content negotiation

use std::fmt;

/// A representation the server can produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    Json,
    MsgPack,
    #[default]
    Table,
    Html,
    JsonLd,
    Turtle,
}

impl ContentType {
    pub const ALL: [ContentType; 6] = [
        Self::Json,
        Self::MsgPack,
        Self::Table,
        Self::Html,
        Self::JsonLd,
        Self::Turtle,
    ];

    /// `Content-Type` header value
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::MsgPack => "application/msgpack",
            Self::Table => "text/plain; charset=utf-8",
            Self::Html => "text/html; charset=utf-8",
            Self::JsonLd => "application/ld+json",
            Self::Turtle => "text/turtle; charset=utf-8",
        }
    }

    /// Media types in an `Accept` header that select this representation
    fn media_types(&self) -> &'static [&'static str] {
        match self {
            Self::Json => &["application/json"],
            Self::MsgPack => &["application/msgpack", "application/x-msgpack"],
            Self::Table => &["text/plain"],
            Self::Html => &["text/html", "application/xhtml+xml"],
            Self::JsonLd => &["application/ld+json"],
            Self::Turtle => &["text/turtle", "application/x-turtle"],
        }
    }

    /// Short name used by the `format` query parameter
    pub fn format_name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::MsgPack => "msgpack",
            Self::Table => "table",
            Self::Html => "html",
            Self::JsonLd => "jsonld",
            Self::Turtle => "turtle",
        }
    }

    pub fn from_format(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "msgpack" => Some(Self::MsgPack),
            "table" | "text" => Some(Self::Table),
            "html" => Some(Self::Html),
            "jsonld" | "json-ld" => Some(Self::JsonLd),
            "turtle" | "ttl" => Some(Self::Turtle),
            _ => None,
        }
    }

    fn from_media_type(media_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|ct| ct.media_types().iter().any(|m| m.eq_ignore_ascii_case(media_type)))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

fn quality(params: &str) -> f32 {
    params
        .split(';')
        .filter_map(|p| p.trim().split_once('='))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("q"))
        .and_then(|(_, v)| v.trim().parse::<f32>().ok())
        .unwrap_or(1.0)
}

/// Pick a representation from an `Accept` header.
///
/// Only exact media types count; wildcards, unknown types and a missing header
/// all fall back to the flat table. Among matches the highest quality wins,
/// ties going to the earliest entry.
pub fn negotiate(accept: Option<&str>) -> ContentType {
    let Some(accept) = accept else {
        return ContentType::default();
    };

    let mut best: Option<(f32, ContentType)> = None;
    for entry in accept.split(',') {
        let (media_type, params) = entry.split_once(';').unwrap_or((entry, ""));
        let Some(content_type) = ContentType::from_media_type(media_type.trim()) else {
            continue;
        };
        let q = quality(params);
        if q <= 0.0 {
            continue;
        }
        if best.map_or(true, |(best_q, _)| q > best_q) {
            best = Some((q, content_type));
        }
    }

    best.map(|(_, ct)| ct).unwrap_or_default()
}

/// `format` query parameter first, then the `Accept` header
pub fn select(format: Option<&str>, accept: Option<&str>) -> ContentType {
    format
        .and_then(ContentType::from_format)
        .unwrap_or_else(|| negotiate(accept))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_table() {
        assert_eq!(negotiate(None), ContentType::Table);
        assert_eq!(negotiate(Some("*/*")), ContentType::Table);
        assert_eq!(negotiate(Some("application/x-unknown")), ContentType::Table);
        assert_eq!(negotiate(Some("")), ContentType::Table);
    }

    #[test]
    fn test_browser_accept_gets_html() {
        let accept = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
        assert_eq!(negotiate(Some(accept)), ContentType::Html);
    }

    #[test]
    fn test_quality_ordering() {
        assert_eq!(
            negotiate(Some("text/html;q=0.5, application/ld+json")),
            ContentType::JsonLd
        );
        assert_eq!(
            negotiate(Some("application/json, application/msgpack")),
            ContentType::Json
        );
        assert_eq!(negotiate(Some("text/turtle;q=0")), ContentType::Table);
    }

    #[test]
    fn test_format_overrides_accept() {
        assert_eq!(select(Some("turtle"), Some("text/html")), ContentType::Turtle);
        assert_eq!(select(Some("bogus"), Some("text/html")), ContentType::Html);
        assert_eq!(select(None, None), ContentType::Table);
    }
}
