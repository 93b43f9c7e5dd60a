//! Material Requisition Entity
//!
//! Parts or supplies requested against a service order. `os_id` is not
//! checked against the `service_orders` collection.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use utoipa::ToSchema;

use super::timestamp::{optional_stored_timestamp, stored_timestamp};
use crate::error::{PlatformError, Result};

/// Material requisition status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MaterialStatus {
    #[default]
    #[serde(rename = "Solicitado")]
    Solicitado,
    #[serde(rename = "Aprovado")]
    Aprovado,
    #[serde(rename = "Entregue")]
    Entregue,
}

impl MaterialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialStatus::Solicitado => "Solicitado",
            MaterialStatus::Aprovado => "Aprovado",
            MaterialStatus::Entregue => "Entregue",
        }
    }
}

impl std::fmt::Display for MaterialStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted material requisition (collection `materials`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Material {
    pub id: String,

    /// Owning service order id
    pub os_id: String,

    pub descricao: String,

    pub quantidade: i64,

    #[serde(default)]
    pub status: MaterialStatus,

    /// Username of the requester
    pub solicitado_por: String,

    #[serde(deserialize_with = "stored_timestamp")]
    pub data_solicitacao: DateTime<Utc>,

    #[serde(default)]
    pub aprovado_por: Option<String>,

    #[serde(default, deserialize_with = "optional_stored_timestamp")]
    pub data_aprovacao: Option<DateTime<Utc>>,
}

impl Material {
    pub fn new(fields: NewMaterial, solicitado_por: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            os_id: fields.os_id,
            descricao: fields.descricao,
            quantidade: fields.quantidade,
            status: MaterialStatus::Solicitado,
            solicitado_por: solicitado_por.into(),
            data_solicitacao: Utc::now(),
            aprovado_por: None,
            data_aprovacao: None,
        }
    }

    pub fn apply_status_change(&mut self, change: &MaterialStatusChange) {
        self.status = change.status;
        if let Some(ref approval) = change.approval {
            self.aprovado_por = Some(approval.aprovado_por.clone());
            self.data_aprovacao = Some(approval.data_aprovacao);
        }
    }
}

/// Fields a client supplies when requesting a material
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewMaterial {
    pub os_id: String,
    pub descricao: String,
    pub quantidade: i64,
}

impl NewMaterial {
    pub fn validate(&self) -> Result<()> {
        if self.os_id.trim().is_empty() {
            return Err(PlatformError::validation("os_id must not be empty"));
        }
        if self.descricao.trim().is_empty() {
            return Err(PlatformError::validation("descricao must not be empty"));
        }
        if self.quantidade < 1 {
            return Err(PlatformError::validation("quantidade must be a positive integer"));
        }
        Ok(())
    }
}

/// Approval stamp written when a material becomes `Aprovado`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
    pub aprovado_por: String,
    pub data_aprovacao: DateTime<Utc>,
}

/// A status write. Approval is stamped iff the new status is `Aprovado`,
/// including repeated approvals; other statuses leave prior approval fields
/// in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialStatusChange {
    pub status: MaterialStatus,
    pub approval: Option<Approval>,
}

impl MaterialStatusChange {
    pub fn new(status: MaterialStatus, actor: &str, now: DateTime<Utc>) -> Self {
        let approval = match status {
            MaterialStatus::Aprovado => Some(Approval {
                aprovado_por: actor.to_string(),
                data_aprovacao: now,
            }),
            MaterialStatus::Solicitado | MaterialStatus::Entregue => None,
        };
        Self { status, approval }
    }
}
