//! Aggregation Reporter
//!
//! Read-only dashboard figures. Each figure is its own store query, so the
//! totals and the groupings may disagree under concurrent writes.

use std::sync::Arc;

use crate::domain::{DashboardSummary, ServiceOrderGroupKey};
use crate::error::Result;
use crate::repository::{MaterialRepository, ServiceOrderRepository};

pub struct AggregationReporter {
    orders: Arc<dyn ServiceOrderRepository>,
    materials: Arc<dyn MaterialRepository>,
}

impl AggregationReporter {
    pub fn new(orders: Arc<dyn ServiceOrderRepository>, materials: Arc<dyn MaterialRepository>) -> Self {
        Self { orders, materials }
    }

    pub async fn summary(&self) -> Result<DashboardSummary> {
        Ok(DashboardSummary {
            total_os: self.orders.count().await?,
            total_materials: self.materials.count().await?,
            os_by_status: self.orders.count_by(ServiceOrderGroupKey::Status).await?,
            os_by_technician: self.orders.count_by(ServiceOrderGroupKey::Responsavel).await?,
            os_by_priority: self.orders.count_by(ServiceOrderGroupKey::Prioridade).await?,
        })
    }
}
