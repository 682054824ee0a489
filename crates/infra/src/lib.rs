//! Postgres persistence for the pickup-point service.
//!
//! Implements the store traits from `pickpoint-auth` and
//! `pickpoint-receiving` over sqlx. Conditional writes carry the state-machine
//! guards into SQL so they hold under concurrency; the partial unique index
//! on `receptions` backs the one-open-reception rule.

pub mod db;
pub mod receiving;
pub mod users;

pub use db::{connect, run_migrations};
pub use receiving::PostgresReceivingStore;
pub use users::PostgresUserStore;
