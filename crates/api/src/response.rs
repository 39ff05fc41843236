//! Shared response envelope types for API handlers.
//!
//! Single records use the `{ "data": ... }` envelope; listings use
//! [`redress_core::pagination::Page`], optionally extended with a status
//! histogram.

use std::collections::BTreeMap;

use redress_core::pagination::Page;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: complaint }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A page of results plus `{status -> count}` over the same filters.
#[derive(Debug, Serialize)]
pub struct HistogramPage<T: Serialize> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub histogram: BTreeMap<String, i64>,
}

/// Body for operations that only report success.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
