use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use pickpoint_auth::Operation;
use pickpoint_core::PickupPointId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub async fn add(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::AddProductRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, Operation::AddProduct) {
        return resp;
    }

    match services
        .products
        .add(PickupPointId::from_uuid(body.pvz_id), &body.product_type)
        .await
    {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_last(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Path(pvz_id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, Operation::RemoveLastProduct) {
        return resp;
    }

    let point: PickupPointId = match pvz_id.parse() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.products.remove_last(point).await {
        Ok(id) => (StatusCode::OK, Json(json!({ "id": id }))).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
