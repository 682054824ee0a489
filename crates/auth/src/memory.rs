//! In-memory user store.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::anyhow;
use async_trait::async_trait;

use pickpoint_core::StoreError;

use crate::{InsertOutcome, User, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    by_email: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: &User) -> Result<InsertOutcome, StoreError> {
        let mut users = self
            .by_email
            .write()
            .map_err(|_| StoreError::new(anyhow!("lock poisoned")))?;
        if users.contains_key(&user.email) {
            return Ok(InsertOutcome::EmailTaken);
        }
        users.insert(user.email.clone(), user.clone());
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self
            .by_email
            .read()
            .map_err(|_| StoreError::new(anyhow!("lock poisoned")))?;
        Ok(users.get(email).cloned())
    }
}
