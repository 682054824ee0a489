//! Role checks at the handler boundary.
//!
//! Handlers name the operation they perform; the role matrix in
//! `pickpoint-auth` decides, so policy lives in one place.

use axum::http::StatusCode;

use pickpoint_auth::{Operation, authorize};

use crate::app::errors::json_error;
use crate::context::AuthContext;

/// Check that the authenticated caller may perform `operation`.
pub fn require(
    ctx: &AuthContext,
    operation: Operation,
) -> Result<(), axum::response::Response> {
    authorize(ctx.role(), operation)
        .map_err(|e| json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string()))
}
