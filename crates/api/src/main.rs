use std::sync::Arc;

use pickpoint_api::app::{build_app, services::AppServices};
use pickpoint_auth::JwtCodec;

#[tokio::main]
async fn main() {
    pickpoint_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let pool = pickpoint_infra::connect(&database_url)
        .await
        .expect("failed to connect to postgres");
    pickpoint_infra::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    let jwt = Arc::new(JwtCodec::new(jwt_secret.as_bytes()));
    let services = Arc::new(AppServices::postgres(pool, jwt.clone()));
    let app = build_app(services, jwt);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind_addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
