//! Shared response envelope types for API handlers.
//!
//! Every success body is a `{ "data": ... }` envelope. List endpoints use
//! [`PaginatedResponse`], which adds the total row count and the effective
//! page window.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: project }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [...], "total": n, "limit": l, "offset": o }` envelope.
///
/// `limit` and `offset` are the clamped values actually used for the query.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}
