//! Request dispatch
//!
//! Every request is authorized before the route is even looked at, so a
//! denied caller learns nothing about which routes exist.

use super::host::ExportHost;
use super::response;
use crate::core::error::ExportError;
use crate::core::query::ExportParams;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::get;
use std::collections::HashMap;
use std::sync::Arc;

/// Mount the export routes under the configured API segment
pub fn build_routes(host: Arc<ExportHost>) -> Router {
    let base = format!("/{}", host.config.api_segment());

    Router::new()
        .route(&base, get(index_handler))
        .route(&format!("{}/", base), get(index_handler))
        .route(&format!("{}/{{*route}}", base), get(route_handler))
        .with_state(host)
}

// Query strings are read as a plain map so repeated parameters never turn
// into an extractor rejection; the last occurrence wins.
async fn index_handler(
    State(host): State<Arc<ExportHost>>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ExportError> {
    dispatch(&host, "", &ExportParams::from(query)).await
}

async fn route_handler(
    State(host): State<Arc<ExportHost>>,
    Path(route): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Result<Response, ExportError> {
    dispatch(&host, &route, &ExportParams::from(query)).await
}

/// Authorize, resolve the route key and produce the response
pub async fn dispatch(
    host: &ExportHost,
    path: &str,
    params: &ExportParams,
) -> Result<Response, ExportError> {
    authorize(host, params)?;

    let route = path.trim_matches('/');
    if route.is_empty() {
        return Ok(response::descriptor(&host.index));
    }

    let exporter = host
        .exporters
        .get(route)
        .ok_or_else(|| ExportError::RouteNotFound {
            route: route.to_string(),
        })?;

    let page = params.page();
    let exported = exporter.export(page).await.inspect_err(|e| {
        tracing::error!(route, page, error = %e, "export failed");
    })?;

    tracing::debug!(
        route,
        page,
        records = exported.records.len(),
        total = exported.pagination.total,
        "page exported"
    );

    Ok(response::emit(exported.records, exported.pagination))
}

fn authorize(host: &ExportHost, params: &ExportParams) -> Result<(), ExportError> {
    let granted = host
        .credentials
        .verify(params.api_key.as_deref())
        .map_err(|e| ExportError::Settings {
            message: e.to_string(),
        })?;

    if !granted {
        tracing::warn!(key_presented = params.api_key.is_some(), "access denied");
        return Err(ExportError::AccessDenied);
    }
    Ok(())
}
