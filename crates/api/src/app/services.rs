//! Service construction over concrete stores.

use std::sync::Arc;

use sqlx::PgPool;

use pickpoint_auth::memory::InMemoryUserStore;
use pickpoint_auth::{AccountService, JwtCodec, UserStore};
use pickpoint_infra::{PostgresReceivingStore, PostgresUserStore};
use pickpoint_receiving::{
    HistoryStore, InMemoryReceivingStore, PickupPointService, PickupPointStore, ProductService,
    ProductStore, ReceptionService, ReceptionStore,
};

/// All application services, behind one handle for the handlers.
pub struct AppServices {
    pub accounts: AccountService,
    pub pickup_points: PickupPointService,
    pub receptions: ReceptionService,
    pub products: ProductService,
}

impl AppServices {
    fn from_parts(
        users: Arc<dyn UserStore>,
        points: Arc<dyn PickupPointStore>,
        receptions: Arc<dyn ReceptionStore>,
        products: Arc<dyn ProductStore>,
        history: Arc<dyn HistoryStore>,
        jwt: Arc<JwtCodec>,
    ) -> Self {
        Self {
            accounts: AccountService::new(users, jwt),
            pickup_points: PickupPointService::new(points, history),
            receptions: ReceptionService::new(receptions),
            products: ProductService::new(products),
        }
    }

    /// Everything in memory; used by tests and local development.
    pub fn in_memory(jwt: Arc<JwtCodec>) -> Self {
        let store = Arc::new(InMemoryReceivingStore::new());
        Self::from_parts(
            Arc::new(InMemoryUserStore::new()),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            jwt,
        )
    }

    /// Postgres-backed services over a shared pool.
    pub fn postgres(pool: PgPool, jwt: Arc<JwtCodec>) -> Self {
        let store = Arc::new(PostgresReceivingStore::new(pool.clone()));
        Self::from_parts(
            Arc::new(PostgresUserStore::new(pool)),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            jwt,
        )
    }
}
