//! Product ledger: append to the open reception, remove in LIFO order.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pickpoint_core::{DomainError, PickupPointId, ProductId, ReceptionId};

use crate::error::{ServiceError, ServiceResult};
use crate::store::{DeleteLastOutcome, ProductStore};

/// A single received item, owned by exactly one reception.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub date_time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub product_type: String,
    pub reception_id: ReceptionId,
}

/// Adds and removes products within the point's in-progress reception.
pub struct ProductService {
    products: Arc<dyn ProductStore>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Record a product against the point's open reception.
    ///
    /// Conflict when the point has no reception in progress.
    pub async fn add(&self, point: PickupPointId, product_type: &str) -> ServiceResult<Product> {
        let product_type = product_type.trim();
        if product_type.is_empty() {
            return Err(DomainError::validation("product type must not be empty").into());
        }

        let product = self
            .products
            .insert_into_open(point, ProductId::new(), product_type, Utc::now())
            .await
            .map_err(ServiceError::store("product insert"))?
            .ok_or_else(|| DomainError::conflict("no available receptions"))?;

        tracing::info!(
            product_id = %product.id,
            reception_id = %product.reception_id,
            product_type,
            "added product"
        );
        Ok(product)
    }

    /// Remove the most recently added product from the open reception.
    ///
    /// Conflict when nothing is in progress; not-found when the open
    /// reception is empty.
    pub async fn remove_last(&self, point: PickupPointId) -> ServiceResult<ProductId> {
        match self
            .products
            .delete_last_in_open(point)
            .await
            .map_err(ServiceError::store("product delete"))?
        {
            DeleteLastOutcome::Deleted(id) => {
                tracing::info!(product_id = %id, pickup_point_id = %point, "removed last product");
                Ok(id)
            }
            DeleteLastOutcome::NoOpenReception => {
                Err(DomainError::conflict("no available receptions").into())
            }
            DeleteLastOutcome::Empty => Err(DomainError::NotFound.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryReceivingStore;
    use crate::reception::ReceptionService;

    fn services() -> (ProductService, ReceptionService, Arc<InMemoryReceivingStore>) {
        let store = Arc::new(InMemoryReceivingStore::new());
        (
            ProductService::new(store.clone()),
            ReceptionService::new(store.clone()),
            store,
        )
    }

    #[tokio::test]
    async fn add_without_open_reception_conflicts() {
        let (products, _, _) = services();

        let err = products.add(PickupPointId::new(), "electronics").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(msg)) if msg == "no available receptions"));
    }

    #[tokio::test]
    async fn add_after_close_conflicts() {
        let (products, receptions, _) = services();
        let point = PickupPointId::new();

        receptions.open(point).await.unwrap();
        receptions.close_last(point).await.unwrap();

        let err = products.add(point, "shoes").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(_))));
    }

    #[tokio::test]
    async fn add_attaches_to_open_reception() {
        let (products, receptions, _) = services();
        let point = PickupPointId::new();

        let reception = receptions.open(point).await.unwrap();
        let product = products.add(point, "electronics").await.unwrap();

        assert_eq!(product.reception_id, reception.id);
        assert_eq!(product.product_type, "electronics");
    }

    #[tokio::test]
    async fn add_rejects_blank_type() {
        let (products, receptions, _) = services();
        let point = PickupPointId::new();
        receptions.open(point).await.unwrap();

        let err = products.add(point, "   ").await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn remove_last_is_lifo() {
        let (products, receptions, store) = services();
        let point = PickupPointId::new();
        receptions.open(point).await.unwrap();

        let first = products.add(point, "books").await.unwrap();
        let second = products.add(point, "clothes").await.unwrap();

        let removed = products.remove_last(point).await.unwrap();
        assert_eq!(removed, second.id);

        let remaining = store.products_for_point(point);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, first.id);
    }

    #[tokio::test]
    async fn remove_from_empty_reception_is_not_found() {
        let (products, receptions, _) = services();
        let point = PickupPointId::new();
        receptions.open(point).await.unwrap();

        let err = products.remove_last(point).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound)));
    }

    #[tokio::test]
    async fn remove_after_close_conflicts() {
        let (products, receptions, _) = services();
        let point = PickupPointId::new();

        receptions.open(point).await.unwrap();
        products.add(point, "books").await.unwrap();
        receptions.close_last(point).await.unwrap();

        // Closed receptions are immutable, even if products remain.
        let err = products.remove_last(point).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(msg)) if msg == "no available receptions"));
    }

    #[tokio::test]
    async fn full_receiving_session() {
        let (products, receptions, store) = services();
        let point = PickupPointId::new();

        receptions.open(point).await.unwrap();
        for product_type in ["electronics", "clothes", "shoes"] {
            products.add(point, product_type).await.unwrap();
        }
        products.remove_last(point).await.unwrap();
        receptions.close_last(point).await.unwrap();

        let remaining = store.products_for_point(point);
        let types: Vec<_> = remaining.iter().map(|p| p.product_type.as_str()).collect();
        assert_eq!(types, ["electronics", "clothes"]);
    }
}
