//! Pickup point registry and the aggregated history listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pickpoint_core::{DomainError, PickupPointId, UserId};

use crate::error::{ServiceError, ServiceResult};
use crate::filter::HistoryFilter;
use crate::history::{HistoryPage, group_rows};
use crate::store::{HistoryStore, InsertOutcome, PickupPointStore};

/// A physical location where goods are received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupPoint {
    pub id: PickupPointId,
    pub registration_date: DateTime<Utc>,
    pub city: String,
    /// Moderator who registered the point. Kept off the wire.
    #[serde(skip)]
    pub created_by: UserId,
}

/// Creates pickup points and serves the paged receiving history.
pub struct PickupPointService {
    points: Arc<dyn PickupPointStore>,
    history: Arc<dyn HistoryStore>,
}

impl PickupPointService {
    pub fn new(points: Arc<dyn PickupPointStore>, history: Arc<dyn HistoryStore>) -> Self {
        Self { points, history }
    }

    /// Register a pickup point under a caller-supplied id.
    ///
    /// Ids are client-generated, so re-submitting one is a conflict rather
    /// than an upsert.
    pub async fn create(
        &self,
        id: PickupPointId,
        created_by: UserId,
        city: &str,
        registration_date: DateTime<Utc>,
    ) -> ServiceResult<PickupPoint> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DomainError::validation("city must not be empty").into());
        }

        let point = PickupPoint {
            id,
            registration_date,
            city: city.to_owned(),
            created_by,
        };

        match self
            .points
            .insert(&point)
            .await
            .map_err(ServiceError::store("pickup point insert"))?
        {
            InsertOutcome::Inserted => {
                tracing::info!(pickup_point_id = %point.id, city = %point.city, "created pickup point");
                Ok(point)
            }
            InsertOutcome::AlreadyExists => {
                Err(DomainError::conflict("pickup point already exists").into())
            }
        }
    }

    pub async fn find(&self, id: PickupPointId) -> ServiceResult<Option<PickupPoint>> {
        self.points
            .find_by_id(id)
            .await
            .map_err(ServiceError::store("pickup point lookup"))
    }

    /// One page of pickup points with their receptions and products nested.
    ///
    /// The page boundary falls between pickup points; a point's history is
    /// never split across pages.
    pub async fn list_history(&self, filter: &HistoryFilter) -> ServiceResult<HistoryPage> {
        let rows = self
            .history
            .fetch_page(filter)
            .await
            .map_err(ServiceError::store("history fetch"))?;
        let total = self
            .history
            .count_points(filter)
            .await
            .map_err(ServiceError::store("history count"))?;

        Ok(HistoryPage {
            items: group_rows(rows),
            total,
            page: filter.page(),
            limit: filter.limit(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryReceivingStore;
    use crate::product::ProductService;
    use crate::reception::{ReceptionService, ReceptionStatus};

    struct Fixture {
        points: PickupPointService,
        receptions: ReceptionService,
        products: ProductService,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryReceivingStore::new());
        Fixture {
            points: PickupPointService::new(store.clone(), store.clone()),
            receptions: ReceptionService::new(store.clone()),
            products: ProductService::new(store),
        }
    }

    #[tokio::test]
    async fn create_then_find() {
        let fx = fixture();
        let id = PickupPointId::new();

        let created = fx.points.create(id, UserId::new(), "Moscow", Utc::now()).await.unwrap();
        assert_eq!(created.city, "Moscow");

        let found = fx.points.find(id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn create_duplicate_id_conflicts() {
        let fx = fixture();
        let id = PickupPointId::new();

        fx.points.create(id, UserId::new(), "Moscow", Utc::now()).await.unwrap();
        let err = fx.points.create(id, UserId::new(), "Kazan", Utc::now()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Conflict(msg)) if msg == "pickup point already exists"));
    }

    #[tokio::test]
    async fn create_rejects_blank_city() {
        let fx = fixture();
        let err = fx
            .points
            .create(PickupPointId::new(), UserId::new(), "  ", Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn find_missing_is_none() {
        let fx = fixture();
        assert!(fx.points.find(PickupPointId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn history_nests_receptions_and_products() {
        let fx = fixture();
        let id = PickupPointId::new();
        fx.points.create(id, UserId::new(), "Moscow", Utc::now()).await.unwrap();

        fx.receptions.open(id).await.unwrap();
        fx.products.add(id, "electronics").await.unwrap();
        fx.products.add(id, "clothes").await.unwrap();
        fx.receptions.close_last(id).await.unwrap();

        fx.receptions.open(id).await.unwrap();

        let page = fx
            .points
            .list_history(&HistoryFilter::default())
            .await
            .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.items.len(), 1);
        let point = &page.items[0];
        assert_eq!(point.pickup_point.id, id);
        assert_eq!(point.receptions.len(), 2);

        // Receptions newest-first: the still-open one leads.
        assert_eq!(point.receptions[0].reception.status, ReceptionStatus::InProgress);
        assert!(point.receptions[0].products.is_empty());

        // Products oldest-first inside the closed reception.
        let types: Vec<_> = point.receptions[1]
            .products
            .iter()
            .map(|p| p.product_type.as_str())
            .collect();
        assert_eq!(types, ["electronics", "clothes"]);
    }

    #[tokio::test]
    async fn history_pages_cut_between_points() {
        let fx = fixture();

        // Five points with one reception each, opened in order.
        let mut ids = Vec::new();
        for _ in 0..5 {
            let id = PickupPointId::new();
            fx.points.create(id, UserId::new(), "Kazan", Utc::now()).await.unwrap();
            fx.receptions.open(id).await.unwrap();
            ids.push(id);
        }

        let first = fx
            .points
            .list_history(&HistoryFilter::unbounded(1, 2).unwrap())
            .await
            .unwrap();
        let second = fx
            .points
            .list_history(&HistoryFilter::unbounded(2, 2).unwrap())
            .await
            .unwrap();
        let third = fx
            .points
            .list_history(&HistoryFilter::unbounded(3, 2).unwrap())
            .await
            .unwrap();

        assert_eq!(first.total, 5);
        assert_eq!(first.items.len(), 2);
        assert_eq!(second.items.len(), 2);
        assert_eq!(third.items.len(), 1);

        // Points ordered by newest reception, descending; no point repeats.
        let seen: Vec<_> = first
            .items
            .iter()
            .chain(&second.items)
            .chain(&third.items)
            .map(|p| p.pickup_point.id)
            .collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(seen, expected);
    }

    #[tokio::test]
    async fn history_window_excludes_points_without_matching_receptions() {
        let fx = fixture();

        let with_reception = PickupPointId::new();
        fx.points.create(with_reception, UserId::new(), "Moscow", Utc::now()).await.unwrap();
        fx.receptions.open(with_reception).await.unwrap();

        let without = PickupPointId::new();
        fx.points.create(without, UserId::new(), "Kazan", Utc::now()).await.unwrap();

        let future = Utc::now() + chrono::Duration::days(1);
        let empty = fx
            .points
            .list_history(&HistoryFilter::new(Some(future), None, 1, 10).unwrap())
            .await
            .unwrap();
        assert_eq!(empty.total, 0);
        assert!(empty.items.is_empty());

        let page = fx
            .points
            .list_history(&HistoryFilter::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].pickup_point.id, with_reception);
    }

    #[tokio::test]
    async fn history_page_past_the_end_is_empty() {
        let fx = fixture();
        let id = PickupPointId::new();
        fx.points.create(id, UserId::new(), "Moscow", Utc::now()).await.unwrap();
        fx.receptions.open(id).await.unwrap();

        let page = fx
            .points
            .list_history(&HistoryFilter::unbounded(9, 10).unwrap())
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);
    }
}
