//! Request DTOs and input policy.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use pickpoint_auth::Role;

use crate::app::errors::json_error;

/// Cities a pickup point may open in. Enforced here, not in the core, so the
/// receiving workflow stays city-agnostic.
pub const ALLOWED_CITIES: &[&str] = &["Moscow", "Saint Petersburg", "Kazan"];

pub fn check_city(city: &str) -> Result<(), axum::response::Response> {
    if ALLOWED_CITIES.contains(&city) {
        Ok(())
    } else {
        Err(json_error(
            StatusCode::BAD_REQUEST,
            "invalid_city",
            "city must be one of: Moscow, Saint Petersburg, Kazan",
        ))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DummyLoginRequest {
    pub role: Role,
}

/// Clients may supply their own id and registration date; both default
/// server-side when absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupPointRequest {
    pub id: Option<Uuid>,
    pub registration_date: Option<DateTime<Utc>>,
    pub city: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenReceptionRequest {
    #[serde(rename = "pvzId")]
    pub pvz_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    #[serde(rename = "type")]
    pub product_type: String,
    #[serde(rename = "pvzId")]
    pub pvz_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}
