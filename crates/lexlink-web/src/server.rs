//! HTTP server
//!
//! Mounts one route per dataset-local prefix, the external route, the schema
//! downloads and a health check. Store access runs on the blocking pool.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::error::ServerError;
use crate::negotiate::select;
use crate::resource::{respond, schema_download, ResourceResponse};
use crate::routes::{PathError, RouteKind};
use crate::state::AppState;

/// Maximum request body size (64KB); every route is read-only
const MAX_BODY_SIZE: usize = 64 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    /// Overrides the `Accept` header when it names a known representation
    pub format: Option<String>,
}

/// Build the router for every route the registry defines
pub fn build_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new().route("/health", get(health_handler));

    for spec in state.routes.route_table() {
        tracing::debug!("Mounting {} ({:?})", spec.path, spec.kind);
        router = match spec.kind {
            RouteKind::Resource { prefix } => {
                let Some(base) = spec.path.strip_suffix(":subject") else {
                    continue;
                };
                let base = base.to_string();
                router.route(
                    &spec.path,
                    get(
                        move |State(state): State<Arc<AppState>>,
                              uri: Uri,
                              Query(query): Query<FormatQuery>,
                              headers: HeaderMap| async move {
                            let raw = uri.path().strip_prefix(base.as_str()).unwrap_or_default();
                            resource_handler(state, &prefix, raw, query, &headers).await
                        },
                    ),
                )
            }
            RouteKind::External => {
                let base = format!("{}/", state.routes.external_path());
                router.route(
                    &spec.path,
                    get(
                        move |State(state): State<Arc<AppState>>,
                              uri: Uri,
                              Query(query): Query<FormatQuery>,
                              headers: HeaderMap| async move {
                            let rest = uri.path().strip_prefix(base.as_str()).unwrap_or_default();
                            let (prefix, raw) = rest.split_once('/').unwrap_or((rest, ""));
                            resource_handler(state, prefix, raw, query, &headers).await
                        },
                    ),
                )
            }
            RouteKind::Schema { prefix } => router.route(
                &spec.path,
                get(move |State(state): State<Arc<AppState>>| async move {
                    tokio::task::spawn_blocking(move || schema_download(&state, &prefix)).await?
                }),
            ),
        };
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([header::ACCEPT]);

    router
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(middleware::map_response(bare_not_found))
}

/// A 404 carries no headers, including the ones added by CORS
async fn bare_not_found(mut response: Response) -> Response {
    if response.status() == StatusCode::NOT_FOUND {
        response.headers_mut().clear();
    }
    response
}

/// Resolve the raw path segment, negotiate, then render off the async runtime
async fn resource_handler(
    state: Arc<AppState>,
    prefix: &str,
    raw_local: &str,
    query: FormatQuery,
    headers: &HeaderMap,
) -> Result<ResourceResponse, ServerError> {
    if raw_local.is_empty() {
        return Err(PathError::EmptyLocalName.into());
    }
    let subject = state.routes.resolve(prefix, raw_local)?;
    let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
    let content_type = select(query.format.as_deref(), accept);
    tracing::debug!("GET {} as {}", subject, content_type);

    tokio::task::spawn_blocking(move || respond(&state, &subject, content_type)).await?
}

/// Health check endpoint
async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let store = state.store();
    let name = store.name();
    let (healthy, triples) = tokio::task::spawn_blocking(move || {
        Ok::<_, lexlink_storage::StorageError>((store.health_check()?, store.triple_count()?))
    })
    .await??;

    Ok(Json(serde_json::json!({
        "status": if healthy { "ok" } else { "degraded" },
        "server": "lexlink",
        "version": env!("CARGO_PKG_VERSION"),
        "store": name,
        "triples": triples,
    })))
}

/// Run the HTTP server
pub async fn run_server(state: Arc<AppState>, addr: &str) -> anyhow::Result<()> {
    let routes = state.routes.route_table();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("lexlink listening on {}", addr);
    for spec in &routes {
        tracing::info!("  http://{}{}", addr, spec.path);
    }
    tracing::info!("  Health check: http://{}/health", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
