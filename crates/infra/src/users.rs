//! Postgres-backed user store.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use uuid::Uuid;

use pickpoint_auth::{InsertOutcome, Role, User, UserStore};
use pickpoint_core::{StoreError, UserId};

use crate::db::is_unique_violation;

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    let role: String = row.try_get("role").map_err(StoreError::new)?;
    Ok(User {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(StoreError::new)?),
        email: row.try_get("email").map_err(StoreError::new)?,
        password_hash: row.try_get("password_hash").map_err(StoreError::new)?,
        role: role.parse::<Role>().map_err(StoreError::new)?,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: &User) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, role) VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id.as_uuid())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            // The unique constraint on email caught a racing registration.
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::EmailTaken),
            Err(err) => Err(StoreError::new(err)),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::new)?;

        row.as_ref().map(user_from_row).transpose()
    }
}
