//! Response writer: pagination headers plus a JSON body

use crate::core::query::PaginationMeta;
use crate::core::record::IndexDescriptor;
use axum::Json;
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

/// Total number of items across all pages
pub const COUNT_HEADER: &str = "x-chimp-count";

/// Total number of pages
pub const PAGES_HEADER: &str = "x-chimp-pages";

/// Emit one page of records with its pagination envelope
pub fn emit(records: Vec<Value>, pagination: PaginationMeta) -> Response {
    (
        [
            (HeaderName::from_static(COUNT_HEADER), HeaderValue::from(pagination.total)),
            (HeaderName::from_static(PAGES_HEADER), HeaderValue::from(pagination.total_pages)),
        ],
        Json(records),
    )
        .into_response()
}

/// Emit the index descriptor; it carries no pagination
pub fn descriptor(index: &IndexDescriptor) -> Response {
    Json(index).into_response()
}
