use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use pickpoint_auth::Operation;
use pickpoint_core::PickupPointId;
use pickpoint_receiving::HistoryFilter;
use pickpoint_receiving::filter::{DEFAULT_LIMIT, DEFAULT_PAGE};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::authz;
use crate::context::AuthContext;

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Json(body): Json<dto::CreatePickupPointRequest>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, Operation::CreatePickupPoint) {
        return resp;
    }
    if let Err(resp) = dto::check_city(&body.city) {
        return resp;
    }

    let id = body.id.map_or_else(PickupPointId::new, PickupPointId::from_uuid);
    let registration_date = body.registration_date.unwrap_or_else(Utc::now);

    match services
        .pickup_points
        .create(id, ctx.user_id(), &body.city, registration_date)
        .await
    {
        Ok(point) => (StatusCode::CREATED, Json(point)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    if let Err(resp) = authz::require(&ctx, Operation::ListPickupPoints) {
        return resp;
    }

    let filter = match HistoryFilter::new(
        query.start_date,
        query.end_date,
        query.page.unwrap_or(DEFAULT_PAGE),
        query.limit.unwrap_or(DEFAULT_LIMIT),
    ) {
        Ok(filter) => filter,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.pickup_points.list_history(&filter).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
