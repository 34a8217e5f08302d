//! HTTP surface of the export API
//!
//! - `dispatch`: authorization and route resolution (axum handlers)
//! - `response`: pagination headers and JSON bodies
//! - `lifecycle`: activation, deactivation, version marker
//! - `builder`: fluent construction and graceful serving

pub mod builder;
pub mod dispatch;
pub mod host;
pub mod lifecycle;
pub mod response;

pub use builder::ServerBuilder;
pub use dispatch::{build_routes, dispatch};
pub use host::ExportHost;
pub use lifecycle::{PLUGIN_VERSION, activate, deactivate, sync_version_marker};
pub use response::{COUNT_HEADER, PAGES_HEADER};
