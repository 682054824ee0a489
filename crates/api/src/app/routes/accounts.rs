use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterRequest>,
) -> axum::response::Response {
    let user = match services
        .accounts
        .register(&body.email, &body.password, body.role)
        .await
    {
        Ok(user) => user,
        Err(e) => return errors::account_error_to_response(e),
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "id": user.id,
            "email": user.email,
            "role": user.role,
        })),
    )
        .into_response()
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.accounts.login(&body.email, &body.password).await {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}

pub async fn dummy_login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::DummyLoginRequest>,
) -> axum::response::Response {
    match services.accounts.dummy_login(body.role) {
        Ok(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        Err(e) => errors::account_error_to_response(e),
    }
}
