//! HTTP middleware components
//!
//! Cross-cutting concerns applied to every route.

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdService};
