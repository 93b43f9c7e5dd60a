//! Repository Layer
//!
//! Store seams for the three collections. Each seam has a MongoDB
//! implementation and an in-memory one used in dev mode and tests.

pub mod user;
pub mod service_order;
pub mod material;
pub mod memory;
pub mod indexes;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::Database;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{
    Material, MaterialStatusChange, ServiceOrder, ServiceOrderGroupKey, ServiceOrderPatch, User,
};
use crate::error::Result;

pub use user::MongoUserRepository;
pub use service_order::MongoServiceOrderRepository;
pub use material::MongoMaterialRepository;
pub use memory::{InMemoryMaterialRepository, InMemoryServiceOrderRepository, InMemoryUserRepository};
pub use indexes::ensure_indexes;

/// Upper bound on records returned by any list query.
pub const MAX_BATCH: i64 = 1000;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateUsername` when the username is already taken.
    async fn insert(&self, user: &User) -> Result<()>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn exists_by_username(&self, username: &str) -> Result<bool>;
}

#[async_trait]
pub trait ServiceOrderRepository: Send + Sync {
    async fn insert(&self, order: &ServiceOrder) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceOrder>>;
    async fn find_all(&self, limit: i64) -> Result<Vec<ServiceOrder>>;

    /// Writes the present patch fields plus `updated_at`. Returns whether a
    /// record matched `id`.
    async fn apply_patch(
        &self,
        id: &str,
        patch: &ServiceOrderPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn count(&self) -> Result<u64>;

    /// Record counts per distinct value of `key`. Empty groups are absent.
    async fn count_by(&self, key: ServiceOrderGroupKey) -> Result<BTreeMap<String, u64>>;
}

#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn insert(&self, material: &Material) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Material>>;
    async fn find(&self, os_id: Option<&str>, limit: i64) -> Result<Vec<Material>>;

    /// Returns whether a record matched `id`.
    async fn set_status(&self, id: &str, change: &MaterialStatusChange) -> Result<bool>;

    async fn count(&self) -> Result<u64>;
}

/// Liveness probe for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<()>;
}

pub struct MongoStoreHealth {
    db: Database,
}

impl MongoStoreHealth {
    pub fn new(db: &Database) -> Self {
        Self { db: db.clone() }
    }
}

#[async_trait]
impl StoreHealth for MongoStoreHealth {
    async fn ping(&self) -> Result<()> {
        self.db.run_command(mongodb::bson::doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// The in-memory store is always reachable.
pub struct AlwaysHealthy;

#[async_trait]
impl StoreHealth for AlwaysHealthy {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Repository handles shared by the services and the API.
#[derive(Clone)]
pub struct Store {
    pub users: Arc<dyn UserRepository>,
    pub service_orders: Arc<dyn ServiceOrderRepository>,
    pub materials: Arc<dyn MaterialRepository>,
    pub health: Arc<dyn StoreHealth>,
}

impl Store {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            service_orders: Arc::new(MongoServiceOrderRepository::new(db)),
            materials: Arc::new(MongoMaterialRepository::new(db)),
            health: Arc::new(MongoStoreHealth::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::default()),
            service_orders: Arc::new(InMemoryServiceOrderRepository::default()),
            materials: Arc::new(InMemoryMaterialRepository::default()),
            health: Arc::new(AlwaysHealthy),
        }
    }
}
