//! Dashboard summary

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Service order field a summary groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOrderGroupKey {
    Status,
    Responsavel,
    Prioridade,
}

impl ServiceOrderGroupKey {
    /// Persisted field name
    pub fn field(&self) -> &'static str {
        match self {
            ServiceOrderGroupKey::Status => "status",
            ServiceOrderGroupKey::Responsavel => "responsavel",
            ServiceOrderGroupKey::Prioridade => "prioridade",
        }
    }
}

/// Fleet-wide counts. Each figure comes from its own store query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_os: u64,
    pub total_materials: u64,
    pub os_by_status: BTreeMap<String, u64>,
    pub os_by_technician: BTreeMap<String, u64>,
    pub os_by_priority: BTreeMap<String, u64>,
}
