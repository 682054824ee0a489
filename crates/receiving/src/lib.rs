//! Receiving workflow: pickup points, receptions, and the product ledger.
//!
//! Services own the state machine; stores are dumb persistence seams with
//! conditional writes so the invariants survive concurrent callers.

pub mod error;
pub mod filter;
pub mod history;
pub mod memory;
pub mod pickup_point;
pub mod product;
pub mod reception;
pub mod store;

pub use error::{ServiceError, ServiceResult};
pub use filter::HistoryFilter;
pub use history::{
    HistoryPage, HistoryRow, PickupPointHistory, ReceptionHistory, group_rows,
};
pub use memory::InMemoryReceivingStore;
pub use pickup_point::{PickupPoint, PickupPointService};
pub use product::{Product, ProductService};
pub use reception::{Reception, ReceptionService, ReceptionStatus};
pub use store::{
    DeleteLastOutcome, HistoryStore, InsertOutcome, PickupPointStore, ProductStore,
    ReceptionStore,
};
