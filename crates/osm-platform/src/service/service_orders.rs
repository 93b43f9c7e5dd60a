//! Service Order Workflow
//!
//! Lifecycle of service orders. Any authenticated user may create or update
//! any order; status moves freely between the six states.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{NewServiceOrder, ServiceOrder, ServiceOrderPatch, User};
use crate::error::{PlatformError, Result};
use crate::repository::{ServiceOrderRepository, MAX_BATCH};

const ENTITY: &str = "ServiceOrder";

pub struct ServiceOrderWorkflow {
    orders: Arc<dyn ServiceOrderRepository>,
}

impl ServiceOrderWorkflow {
    pub fn new(orders: Arc<dyn ServiceOrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn create(&self, fields: NewServiceOrder, actor: &User) -> Result<ServiceOrder> {
        fields.validate()?;

        let order = ServiceOrder::new(fields, &actor.username);
        self.orders.insert(&order).await?;

        info!(
            os_id = %order.id,
            numero_os = %order.numero_os,
            created_by = %order.created_by,
            "Service order created"
        );
        Ok(order)
    }

    /// At most `MAX_BATCH` orders, in store order.
    pub async fn list(&self) -> Result<Vec<ServiceOrder>> {
        self.orders.find_all(MAX_BATCH).await
    }

    pub async fn get(&self, id: &str) -> Result<ServiceOrder> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found(ENTITY, id))
    }

    /// Write the present fields, then read the record back.
    pub async fn update(&self, id: &str, patch: ServiceOrderPatch, actor: &User) -> Result<ServiceOrder> {
        patch.validate()?;

        let matched = self.orders.apply_patch(id, &patch, Utc::now()).await?;
        if !matched {
            return Err(PlatformError::not_found(ENTITY, id));
        }

        let order = self.get(id).await?;
        match patch.status {
            Some(status) => info!(os_id = %id, status = %status, updated_by = %actor.username, "Service order updated"),
            None if patch.is_empty() => {
                debug!(os_id = %id, updated_by = %actor.username, "Service order touched with an empty patch")
            }
            None => debug!(os_id = %id, updated_by = %actor.username, "Service order updated"),
        }
        Ok(order)
    }
}
