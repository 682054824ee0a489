use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use pickpoint_auth::Operation;
use pickpoint_core::PickupPointId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub async fn open(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::OpenReceptionRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, Operation::OpenReception) {
        return resp;
    }

    match services
        .receptions
        .open(PickupPointId::from_uuid(body.pvz_id))
        .await
    {
        Ok(reception) => (StatusCode::CREATED, Json(reception)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn close_last(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(pvz_id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, Operation::CloseReception) {
        return resp;
    }

    let point: PickupPointId = match pvz_id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.receptions.close_last(point).await {
        Ok(reception) => (StatusCode::OK, Json(reception)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
