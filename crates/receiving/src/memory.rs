//! In-memory receiving store.
//!
//! Backs unit and black-box tests; mirrors the Postgres implementation's
//! semantics, including the history ordering contract.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use pickpoint_core::{PickupPointId, ProductId, StoreError};

use crate::filter::HistoryFilter;
use crate::history::HistoryRow;
use crate::pickup_point::PickupPoint;
use crate::product::Product;
use crate::reception::{Reception, ReceptionStatus};
use crate::store::{
    DeleteLastOutcome, HistoryStore, InsertOutcome, PickupPointStore, ProductStore,
    ReceptionStore,
};

#[derive(Debug, Default)]
struct Inner {
    points: Vec<PickupPoint>,
    receptions: Vec<Reception>,
    products: Vec<Product>,
}

impl Inner {
    /// Index of the point's in-progress reception, if any.
    fn open_reception_idx(&self, point: PickupPointId) -> Option<usize> {
        self.receptions
            .iter()
            .position(|r| r.pickup_point_id == point && r.status == ReceptionStatus::InProgress)
    }

    /// Newest reception for the point; insertion order breaks timestamp ties.
    fn latest_reception(&self, point: PickupPointId) -> Option<&Reception> {
        self.receptions
            .iter()
            .enumerate()
            .filter(|(_, r)| r.pickup_point_id == point)
            .max_by_key(|(idx, r)| (r.date_time, *idx))
            .map(|(_, r)| r)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryReceivingStore {
    inner: RwLock<Inner>,
}

impl InMemoryReceivingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::new(anyhow!("lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::new(anyhow!("lock poisoned")))
    }

    /// All receptions of the point, in insertion order. Test introspection.
    pub fn receptions_for(&self, point: PickupPointId) -> Vec<Reception> {
        self.inner
            .read()
            .map(|inner| {
                inner
                    .receptions
                    .iter()
                    .filter(|r| r.pickup_point_id == point)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All products under any of the point's receptions, in insertion order.
    /// Test introspection.
    pub fn products_for_point(&self, point: PickupPointId) -> Vec<Product> {
        self.inner
            .read()
            .map(|inner| {
                let reception_ids: Vec<_> = inner
                    .receptions
                    .iter()
                    .filter(|r| r.pickup_point_id == point)
                    .map(|r| r.id)
                    .collect();
                inner
                    .products
                    .iter()
                    .filter(|p| reception_ids.contains(&p.reception_id))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl PickupPointStore for InMemoryReceivingStore {
    async fn insert(&self, point: &PickupPoint) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.write()?;
        if inner.points.iter().any(|p| p.id == point.id) {
            return Ok(InsertOutcome::AlreadyExists);
        }
        inner.points.push(point.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_id(&self, id: PickupPointId) -> Result<Option<PickupPoint>, StoreError> {
        let inner = self.read()?;
        Ok(inner.points.iter().find(|p| p.id == id).cloned())
    }
}

#[async_trait]
impl ReceptionStore for InMemoryReceivingStore {
    async fn latest(&self, point: PickupPointId) -> Result<Option<Reception>, StoreError> {
        let inner = self.read()?;
        Ok(inner.latest_reception(point).cloned())
    }

    async fn insert_open(&self, reception: &Reception) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.write()?;
        // Same rule the partial unique index enforces in Postgres.
        if inner.open_reception_idx(reception.pickup_point_id).is_some() {
            return Ok(InsertOutcome::AlreadyExists);
        }
        inner.receptions.push(reception.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn close_open(&self, point: PickupPointId) -> Result<Option<Reception>, StoreError> {
        let mut inner = self.write()?;
        let Some(idx) = inner.open_reception_idx(point) else {
            return Ok(None);
        };
        inner.receptions[idx].status = ReceptionStatus::Closed;
        Ok(Some(inner.receptions[idx].clone()))
    }
}

#[async_trait]
impl ProductStore for InMemoryReceivingStore {
    async fn insert_into_open(
        &self,
        point: PickupPointId,
        product_id: ProductId,
        product_type: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Product>, StoreError> {
        let mut inner = self.write()?;
        let Some(idx) = inner.open_reception_idx(point) else {
            return Ok(None);
        };
        let product = Product {
            id: product_id,
            date_time: at,
            product_type: product_type.to_owned(),
            reception_id: inner.receptions[idx].id,
        };
        inner.products.push(product.clone());
        Ok(Some(product))
    }

    async fn delete_last_in_open(
        &self,
        point: PickupPointId,
    ) -> Result<DeleteLastOutcome, StoreError> {
        let mut inner = self.write()?;
        let Some(idx) = inner.open_reception_idx(point) else {
            return Ok(DeleteLastOutcome::NoOpenReception);
        };
        let reception_id = inner.receptions[idx].id;

        // Newest first; insertion order breaks timestamp ties.
        let Some(victim) = inner
            .products
            .iter()
            .enumerate()
            .filter(|(_, p)| p.reception_id == reception_id)
            .max_by_key(|(i, p)| (p.date_time, *i))
            .map(|(i, _)| i)
        else {
            return Ok(DeleteLastOutcome::Empty);
        };

        let removed = inner.products.remove(victim);
        Ok(DeleteLastOutcome::Deleted(removed.id))
    }
}

#[async_trait]
impl HistoryStore for InMemoryReceivingStore {
    async fn fetch_page(&self, filter: &HistoryFilter) -> Result<Vec<HistoryRow>, StoreError> {
        let inner = self.read()?;

        // Points ranked by their newest in-window reception, newest first.
        let mut ranked: Vec<(&PickupPoint, (DateTime<Utc>, usize))> = Vec::new();
        for point in &inner.points {
            let newest = inner
                .receptions
                .iter()
                .enumerate()
                .filter(|(_, r)| r.pickup_point_id == point.id && filter.contains(r.date_time))
                .map(|(idx, r)| (r.date_time, idx))
                .max();
            if let Some(key) = newest {
                ranked.push((point, key));
            }
        }
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let mut rows = Vec::new();
        for (point, _) in ranked
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit() as usize)
        {
            let mut receptions: Vec<(usize, &Reception)> = inner
                .receptions
                .iter()
                .enumerate()
                .filter(|(_, r)| {
                    r.pickup_point_id == point.id && filter.contains(r.date_time)
                })
                .collect();
            receptions.sort_by(|a, b| (b.1.date_time, b.0).cmp(&(a.1.date_time, a.0)));

            for (_, reception) in receptions {
                let mut products: Vec<(usize, &Product)> = inner
                    .products
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.reception_id == reception.id)
                    .collect();
                products.sort_by_key(|(idx, p)| (p.date_time, *idx));

                if products.is_empty() {
                    rows.push(HistoryRow {
                        pickup_point: point.clone(),
                        reception: reception.clone(),
                        product: None,
                    });
                } else {
                    for (_, product) in products {
                        rows.push(HistoryRow {
                            pickup_point: point.clone(),
                            reception: reception.clone(),
                            product: Some(product.clone()),
                        });
                    }
                }
            }
        }
        Ok(rows)
    }

    async fn count_points(&self, filter: &HistoryFilter) -> Result<u64, StoreError> {
        let inner = self.read()?;
        let count = inner
            .points
            .iter()
            .filter(|point| {
                inner
                    .receptions
                    .iter()
                    .any(|r| r.pickup_point_id == point.id && filter.contains(r.date_time))
            })
            .count();
        Ok(count as u64)
    }
}
