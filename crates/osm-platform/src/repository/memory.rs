//! In-memory repositories
//!
//! Backing store for dev mode and tests. Guards are never held across an
//! `.await`; every method takes the lock, copies what it needs and returns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use super::{MaterialRepository, ServiceOrderRepository, UserRepository};
use crate::domain::{
    Material, MaterialStatusChange, ServiceOrder, ServiceOrderGroupKey, ServiceOrderPatch, User,
};
use crate::error::{PlatformError, Result};

/// Users keyed by username.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.username) {
            return Err(PlatformError::duplicate_username(&user.username));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.users.read().get(username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        Ok(self.users.read().contains_key(username))
    }
}

/// Orders in insertion order.
#[derive(Default)]
pub struct InMemoryServiceOrderRepository {
    orders: RwLock<Vec<ServiceOrder>>,
}

#[async_trait]
impl ServiceOrderRepository for InMemoryServiceOrderRepository {
    async fn insert(&self, order: &ServiceOrder) -> Result<()> {
        self.orders.write().push(order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceOrder>> {
        Ok(self.orders.read().iter().find(|o| o.id == id).cloned())
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<ServiceOrder>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.orders.read().iter().take(limit).cloned().collect())
    }

    async fn apply_patch(
        &self,
        id: &str,
        patch: &ServiceOrderPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut orders = self.orders.write();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.apply_patch(patch, updated_at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.orders.read().len() as u64)
    }

    async fn count_by(&self, key: ServiceOrderGroupKey) -> Result<BTreeMap<String, u64>> {
        let orders = self.orders.read();
        let mut groups = BTreeMap::new();
        for order in orders.iter() {
            let value = match key {
                ServiceOrderGroupKey::Status => order.status.as_str().to_string(),
                ServiceOrderGroupKey::Responsavel => order.responsavel.clone(),
                ServiceOrderGroupKey::Prioridade => order.prioridade.as_str().to_string(),
            };
            *groups.entry(value).or_insert(0) += 1;
        }
        Ok(groups)
    }
}

/// Materials in insertion order.
#[derive(Default)]
pub struct InMemoryMaterialRepository {
    materials: RwLock<Vec<Material>>,
}

#[async_trait]
impl MaterialRepository for InMemoryMaterialRepository {
    async fn insert(&self, material: &Material) -> Result<()> {
        self.materials.write().push(material.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Material>> {
        Ok(self.materials.read().iter().find(|m| m.id == id).cloned())
    }

    async fn find(&self, os_id: Option<&str>, limit: i64) -> Result<Vec<Material>> {
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(self.materials
            .read()
            .iter()
            .filter(|m| os_id.map_or(true, |os_id| m.os_id == os_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: &str, change: &MaterialStatusChange) -> Result<bool> {
        let mut materials = self.materials.write();
        match materials.iter_mut().find(|m| m.id == id) {
            Some(material) => {
                material.apply_status_change(change);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.materials.read().len() as u64)
    }
}
