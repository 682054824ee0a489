//! Persistence seams for the receiving workflow.
//!
//! Two conventions hold everywhere:
//! - "not found" is `Ok(None)` or an outcome variant, never an `Err`;
//! - writes that depend on current state are conditional in the store, so
//!   two racing callers cannot both succeed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pickpoint_core::{PickupPointId, ProductId, StoreError};

use crate::filter::HistoryFilter;
use crate::history::HistoryRow;
use crate::pickup_point::PickupPoint;
use crate::product::Product;
use crate::reception::Reception;

/// Result of a uniqueness-guarded insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// A row that would violate the uniqueness rule already exists.
    AlreadyExists,
}

/// Result of deleting the newest product in a point's open reception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteLastOutcome {
    Deleted(ProductId),
    /// The point has no reception in progress.
    NoOpenReception,
    /// The open reception has no products left.
    Empty,
}

#[async_trait]
pub trait PickupPointStore: Send + Sync {
    /// Insert a point; `AlreadyExists` if the id is taken.
    async fn insert(&self, point: &PickupPoint) -> Result<InsertOutcome, StoreError>;
    async fn find_by_id(&self, id: PickupPointId) -> Result<Option<PickupPoint>, StoreError>;
}

#[async_trait]
pub trait ReceptionStore: Send + Sync {
    /// Most recent reception of the point by open timestamp, open or closed.
    async fn latest(&self, point: PickupPointId) -> Result<Option<Reception>, StoreError>;

    /// Insert an open reception; `AlreadyExists` if the point already has one
    /// in progress. Backed by a partial unique index in Postgres.
    async fn insert_open(&self, reception: &Reception) -> Result<InsertOutcome, StoreError>;

    /// Flip the point's in-progress reception to closed and return it.
    /// `None` when there is nothing open to close.
    async fn close_open(&self, point: PickupPointId) -> Result<Option<Reception>, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Append a product to the point's open reception. `None` when the point
    /// has no reception in progress; the product row is built inside the
    /// store so the reception lookup and the insert are one atomic step.
    async fn insert_into_open(
        &self,
        point: PickupPointId,
        product_id: ProductId,
        product_type: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError>;

    /// Delete the most recently added product of the point's open reception.
    async fn delete_last_in_open(
        &self,
        point: PickupPointId,
    ) -> Result<DeleteLastOutcome, StoreError>;
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Flat left-join rows for one page of pickup points.
    ///
    /// Contract: rows arrive grouped by pickup point (points ordered by their
    /// newest in-window reception, descending), receptions newest-first
    /// within a point, products oldest-first within a reception, and a
    /// product-less reception contributes exactly one row with
    /// `product: None`. Pagination cuts between points, never inside one.
    async fn fetch_page(&self, filter: &HistoryFilter) -> Result<Vec<HistoryRow>, StoreError>;

    /// Distinct pickup points with at least one reception in the window.
    async fn count_points(&self, filter: &HistoryFilter) -> Result<u64, StoreError>;
}
