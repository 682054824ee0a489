//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: service construction over concrete stores
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request DTOs and input policy (city whitelist, paging defaults)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get, routing::post};

use pickpoint_auth::JwtCodec;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(services: Arc<services::AppServices>, jwt: Arc<JwtCodec>) -> Router {
    let auth_state = middleware::AuthState { jwt };

    // Protected routes: require a verified bearer token.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/register", post(routes::accounts::register))
        .route("/login", post(routes::accounts::login))
        .route("/dummyLogin", post(routes::accounts::dummy_login))
        .merge(protected)
        .layer(Extension(services))
}
