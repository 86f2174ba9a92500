//! Request pipeline: subject + content type → response

use crate::error::ServerError;
use crate::negotiate::ContentType;
use crate::render::{render, RenderContext};
use crate::state::AppState;
use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use lexlink_core::Iri;
use lexlink_storage::resolve_resource;

/// A fully rendered response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ResourceResponse {
    /// Empty 404 without headers
    pub fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok(content_type: &str, max_age: u64, body: Vec<u8>) -> Self {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }
        if let Ok(value) = HeaderValue::from_str(&format!("max-age={}", max_age)) {
            headers.insert(header::CACHE_CONTROL, value);
        }
        Self {
            status: StatusCode::OK,
            headers,
            body,
        }
    }
}

impl IntoResponse for ResourceResponse {
    fn into_response(self) -> Response {
        let mut response = Response::new(Body::from(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response
    }
}

/// Resolve and render `subject`; blocking, call from a worker thread
pub fn respond(
    state: &AppState,
    subject: &Iri,
    content_type: ContentType,
) -> Result<ResourceResponse, ServerError> {
    let view = state.view();
    let Some(resolved) = resolve_resource(view.store.as_ref(), subject, &view.labels)? else {
        tracing::debug!("{} not found", subject);
        return Ok(ResourceResponse::not_found());
    };

    let ctx = RenderContext {
        registry: &state.registry,
        selector: &state.selector,
        routes: &state.routes,
        sections: &state.sections,
        assets: &state.settings.assets,
        blanks: &resolved.blanks,
    };
    let body = render(content_type, &resolved.entity, &ctx)?;
    tracing::debug!(
        "Rendered {} as {} ({} bytes)",
        subject,
        content_type,
        body.len()
    );

    Ok(ResourceResponse::ok(
        content_type.mime(),
        state.settings.entity_max_age,
        body,
    ))
}

/// Schema file for `prefix` as an attachment; blocking
pub fn schema_download(state: &AppState, prefix: &str) -> Result<ResourceResponse, ServerError> {
    let Some(schema) = state.routes.schema(prefix) else {
        return Ok(ResourceResponse::not_found());
    };

    let path = state.settings.schema_dir.join(&schema.file);
    let body = match std::fs::read(&path) {
        Ok(body) => body,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Schema file for {} missing: {}", prefix, path.display());
            return Ok(ResourceResponse::not_found());
        }
        Err(e) => return Err(e.into()),
    };

    let mut response =
        ResourceResponse::ok(&schema.content_type, state.settings.schema_max_age, body);
    let disposition = format!("attachment; filename=\"{}\"", schema.filename());
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response.headers.insert(header::CONTENT_DISPOSITION, value);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Settings;
    use lexlink_core::{Literal, PrefixEntry, PrefixRegistry, SchemaDownload, Triple};
    use lexlink_storage::MemoryGraph;
    use std::sync::Arc;

    fn state(settings: Settings) -> AppState {
        let store = MemoryGraph::new();
        lexlink_storage::TripleStore::insert_triples(
            &store,
            &[Triple::new(
                Iri::new("https://wordnet.dk/dannet/data/synset-1"),
                "http://www.w3.org/2000/01/rdf-schema#label",
                Literal::lang("hus", "da"),
            )],
        )
        .unwrap();
        let registry = PrefixRegistry::new(vec![
            PrefixEntry::local("dn", "https://wordnet.dk/dannet/data/", "/dannet/data"),
            PrefixEntry::external("rdfs", "http://www.w3.org/2000/01/rdf-schema#").with_schema(
                SchemaDownload::new("rdfs.ttl", "http://www.w3.org/2000/01/rdf-schema.ttl"),
            ),
        ])
        .unwrap();
        AppState::new(Arc::new(store), registry, vec!["da".to_string()], settings)
    }

    #[test]
    fn test_found_and_missing() {
        let state = state(Settings::default());
        let found = respond(
            &state,
            &Iri::new("https://wordnet.dk/dannet/data/synset-1"),
            ContentType::Json,
        )
        .unwrap();
        assert_eq!(found.status, StatusCode::OK);
        assert_eq!(found.headers[header::CACHE_CONTROL], "max-age=86400");
        assert_eq!(found.headers[header::CONTENT_TYPE], "application/json");

        let missing = respond(
            &state,
            &Iri::new("https://wordnet.dk/dannet/data/nothing"),
            ContentType::Html,
        )
        .unwrap();
        assert_eq!(missing, ResourceResponse::not_found());
    }

    #[test]
    fn test_schema_download() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rdfs.ttl"), "@prefix rdfs: <x> .").unwrap();
        let state = state(Settings {
            schema_dir: dir.path().to_path_buf(),
            ..Settings::default()
        });

        let response = schema_download(&state, "rdfs").unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"rdf-schema.ttl\""
        );
        assert_eq!(response.headers[header::CACHE_CONTROL], "max-age=31536000");
        assert_eq!(response.headers[header::CONTENT_TYPE], "text/turtle");

        assert_eq!(schema_download(&state, "dn").unwrap(), ResourceResponse::not_found());
    }
}
