//! Postgres-backed receiving stores.
//!
//! The state-machine guards live in the SQL itself: opens hit the partial
//! unique index, closes and product writes are conditional on
//! `status = 'in_progress'`, and remove-last pins the open reception with
//! `FOR UPDATE` so two removals cannot delete the same row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use pickpoint_core::{PickupPointId, ProductId, ReceptionId, StoreError, UserId};
use pickpoint_receiving::{
    DeleteLastOutcome, HistoryFilter, HistoryRow, HistoryStore, InsertOutcome, PickupPoint,
    PickupPointStore, Product, ProductStore, Reception, ReceptionStatus, ReceptionStore,
};

use crate::db::is_unique_violation;

pub struct PostgresReceivingStore {
    pool: PgPool,
}

impl PostgresReceivingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn point_from_row(row: &PgRow) -> Result<PickupPoint, StoreError> {
    Ok(PickupPoint {
        id: PickupPointId::from_uuid(row.try_get::<Uuid, _>("id").map_err(StoreError::new)?),
        registration_date: row.try_get("registration_date").map_err(StoreError::new)?,
        city: row.try_get("city").map_err(StoreError::new)?,
        created_by: UserId::from_uuid(
            row.try_get::<Uuid, _>("created_by").map_err(StoreError::new)?,
        ),
    })
}

fn reception_from_row(row: &PgRow) -> Result<Reception, StoreError> {
    let status: String = row.try_get("status").map_err(StoreError::new)?;
    Ok(Reception {
        id: ReceptionId::from_uuid(row.try_get::<Uuid, _>("id").map_err(StoreError::new)?),
        date_time: row.try_get("date_time").map_err(StoreError::new)?,
        pickup_point_id: PickupPointId::from_uuid(
            row.try_get::<Uuid, _>("pickup_point_id").map_err(StoreError::new)?,
        ),
        status: status.parse::<ReceptionStatus>().map_err(StoreError::new)?,
    })
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    Ok(Product {
        id: ProductId::from_uuid(row.try_get::<Uuid, _>("id").map_err(StoreError::new)?),
        date_time: row.try_get("date_time").map_err(StoreError::new)?,
        product_type: row.try_get("type").map_err(StoreError::new)?,
        reception_id: ReceptionId::from_uuid(
            row.try_get::<Uuid, _>("reception_id").map_err(StoreError::new)?,
        ),
    })
}

#[async_trait]
impl PickupPointStore for PostgresReceivingStore {
    async fn insert(&self, point: &PickupPoint) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            "INSERT INTO pickup_points (id, registration_date, city, created_by) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(point.id.as_uuid())
        .bind(point.registration_date)
        .bind(&point.city)
        .bind(point.created_by.as_uuid())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::AlreadyExists),
            Err(err) => Err(StoreError::new(err)),
        }
    }

    async fn find_by_id(&self, id: PickupPointId) -> Result<Option<PickupPoint>, StoreError> {
        let row = sqlx::query(
            "SELECT id, registration_date, city, created_by FROM pickup_points WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::new)?;

        row.as_ref().map(point_from_row).transpose()
    }
}

#[async_trait]
impl ReceptionStore for PostgresReceivingStore {
    async fn latest(&self, point: PickupPointId) -> Result<Option<Reception>, StoreError> {
        let row = sqlx::query(
            "SELECT id, date_time, pickup_point_id, status \
             FROM receptions \
             WHERE pickup_point_id = $1 \
             ORDER BY date_time DESC \
             LIMIT 1",
        )
        .bind(point.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::new)?;

        row.as_ref().map(reception_from_row).transpose()
    }

    async fn insert_open(&self, reception: &Reception) -> Result<InsertOutcome, StoreError> {
        let result = sqlx::query(
            "INSERT INTO receptions (id, date_time, pickup_point_id, status) \
             VALUES ($1, $2, $3, 'in_progress')",
        )
        .bind(reception.id.as_uuid())
        .bind(reception.date_time)
        .bind(reception.pickup_point_id.as_uuid())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Inserted),
            // The partial unique index caught a racing open.
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::AlreadyExists),
            Err(err) => Err(StoreError::new(err)),
        }
    }

    async fn close_open(&self, point: PickupPointId) -> Result<Option<Reception>, StoreError> {
        let row = sqlx::query(
            "UPDATE receptions SET status = 'close' \
             WHERE pickup_point_id = $1 AND status = 'in_progress' \
             RETURNING id, date_time, pickup_point_id, status",
        )
        .bind(point.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::new)?;

        row.as_ref().map(reception_from_row).transpose()
    }
}

#[async_trait]
impl ProductStore for PostgresReceivingStore {
    async fn insert_into_open(
        &self,
        point: PickupPointId,
        product_id: ProductId,
        product_type: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        // Reception lookup and insert in one statement; inserts nothing when
        // no reception is in progress.
        let row = sqlx::query(
            "INSERT INTO products (id, date_time, type, reception_id) \
             SELECT $1, $2, $3, r.id \
             FROM receptions r \
             WHERE r.pickup_point_id = $4 AND r.status = 'in_progress' \
             RETURNING id, date_time, type, reception_id",
        )
        .bind(product_id.as_uuid())
        .bind(at)
        .bind(product_type)
        .bind(point.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::new)?;

        row.as_ref().map(product_from_row).transpose()
    }

    async fn delete_last_in_open(
        &self,
        point: PickupPointId,
    ) -> Result<DeleteLastOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(StoreError::new)?;

        // Pin the open reception for the length of the transaction.
        let reception = sqlx::query(
            "SELECT id FROM receptions \
             WHERE pickup_point_id = $1 AND status = 'in_progress' \
             FOR UPDATE",
        )
        .bind(point.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::new)?;

        let Some(reception) = reception else {
            return Ok(DeleteLastOutcome::NoOpenReception);
        };
        let reception_id: Uuid = reception.try_get("id").map_err(StoreError::new)?;

        let deleted = sqlx::query(
            "DELETE FROM products WHERE id = ( \
                 SELECT id FROM products \
                 WHERE reception_id = $1 \
                 ORDER BY date_time DESC, id DESC \
                 LIMIT 1 \
             ) RETURNING id",
        )
        .bind(reception_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(StoreError::new)?;

        tx.commit().await.map_err(StoreError::new)?;

        match deleted {
            Some(row) => {
                let id: Uuid = row.try_get("id").map_err(StoreError::new)?;
                Ok(DeleteLastOutcome::Deleted(ProductId::from_uuid(id)))
            }
            None => Ok(DeleteLastOutcome::Empty),
        }
    }
}

#[async_trait]
impl HistoryStore for PostgresReceivingStore {
    async fn fetch_page(&self, filter: &HistoryFilter) -> Result<Vec<HistoryRow>, StoreError> {
        // Page over pickup points, not flat rows: the CTE picks the page of
        // points by their newest in-window reception, the outer query then
        // re-joins the full window so no point's history is truncated.
        let rows = sqlx::query(
            "WITH page_points AS ( \
                 SELECT r.pickup_point_id AS id, MAX(r.date_time) AS newest \
                 FROM receptions r \
                 WHERE ($1::timestamptz IS NULL OR r.date_time >= $1) \
                   AND ($2::timestamptz IS NULL OR r.date_time <= $2) \
                 GROUP BY r.pickup_point_id \
                 ORDER BY newest DESC, id \
                 LIMIT $3 OFFSET $4 \
             ) \
             SELECT p.id AS point_id, p.registration_date, p.city, p.created_by, \
                    r.id AS reception_id, r.date_time AS reception_date_time, r.status, \
                    pr.id AS product_id, pr.date_time AS product_date_time, \
                    pr.type AS product_type \
             FROM page_points pp \
             JOIN pickup_points p ON p.id = pp.id \
             JOIN receptions r ON r.pickup_point_id = p.id \
             LEFT JOIN products pr ON pr.reception_id = r.id \
             WHERE ($1::timestamptz IS NULL OR r.date_time >= $1) \
               AND ($2::timestamptz IS NULL OR r.date_time <= $2) \
             ORDER BY pp.newest DESC, pp.id, \
                      r.date_time DESC, r.id DESC, \
                      pr.date_time ASC, pr.id ASC",
        )
        .bind(filter.start_date())
        .bind(filter.end_date())
        .bind(i64::from(filter.limit()))
        .bind(filter.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(StoreError::new)?;

        rows.iter().map(history_row_from_row).collect()
    }

    async fn count_points(&self, filter: &HistoryFilter) -> Result<u64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(DISTINCT pickup_point_id) AS total \
             FROM receptions \
             WHERE ($1::timestamptz IS NULL OR date_time >= $1) \
               AND ($2::timestamptz IS NULL OR date_time <= $2)",
        )
        .bind(filter.start_date())
        .bind(filter.end_date())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::new)?;

        let total: i64 = row.try_get("total").map_err(StoreError::new)?;
        Ok(total as u64)
    }
}

fn history_row_from_row(row: &PgRow) -> Result<HistoryRow, StoreError> {
    let status: String = row.try_get("status").map_err(StoreError::new)?;
    let product_id: Option<Uuid> = row.try_get("product_id").map_err(StoreError::new)?;

    let pickup_point = PickupPoint {
        id: PickupPointId::from_uuid(row.try_get::<Uuid, _>("point_id").map_err(StoreError::new)?),
        registration_date: row.try_get("registration_date").map_err(StoreError::new)?,
        city: row.try_get("city").map_err(StoreError::new)?,
        created_by: UserId::from_uuid(
            row.try_get::<Uuid, _>("created_by").map_err(StoreError::new)?,
        ),
    };
    let reception = Reception {
        id: ReceptionId::from_uuid(
            row.try_get::<Uuid, _>("reception_id").map_err(StoreError::new)?,
        ),
        date_time: row.try_get("reception_date_time").map_err(StoreError::new)?,
        pickup_point_id: pickup_point.id,
        status: status.parse::<ReceptionStatus>().map_err(StoreError::new)?,
    };
    let product = product_id
        .map(|id| -> Result<Product, StoreError> {
            Ok(Product {
                id: ProductId::from_uuid(id),
                date_time: row.try_get("product_date_time").map_err(StoreError::new)?,
                product_type: row.try_get("product_type").map_err(StoreError::new)?,
                reception_id: reception.id,
            })
        })
        .transpose()?;

    Ok(HistoryRow { pickup_point, reception, product })
}
