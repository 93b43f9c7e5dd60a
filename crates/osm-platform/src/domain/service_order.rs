//! Service Order Entity
//!
//! A maintenance or task request (OS, "ordem de serviço") with a lifecycle
//! status. Any status may replace any other; there is no transition graph.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Local, Utc};
use utoipa::ToSchema;

use super::timestamp::{optional_stored_timestamp, stored_timestamp};
use crate::error::{PlatformError, Result};

/// Service order lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ServiceOrderStatus {
    #[default]
    #[serde(rename = "Aberta")]
    Aberta,
    #[serde(rename = "Atribuída", alias = "Atribuida")]
    Atribuida,
    #[serde(rename = "Em Andamento", alias = "EmAndamento", alias = "Em_Andamento")]
    EmAndamento,
    #[serde(rename = "Pausada")]
    Pausada,
    #[serde(rename = "Concluída", alias = "Concluida")]
    Concluida,
    #[serde(rename = "Cancelada")]
    Cancelada,
}

impl ServiceOrderStatus {
    pub const ALL: [ServiceOrderStatus; 6] = [
        ServiceOrderStatus::Aberta,
        ServiceOrderStatus::Atribuida,
        ServiceOrderStatus::EmAndamento,
        ServiceOrderStatus::Pausada,
        ServiceOrderStatus::Concluida,
        ServiceOrderStatus::Cancelada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceOrderStatus::Aberta => "Aberta",
            ServiceOrderStatus::Atribuida => "Atribuída",
            ServiceOrderStatus::EmAndamento => "Em Andamento",
            ServiceOrderStatus::Pausada => "Pausada",
            ServiceOrderStatus::Concluida => "Concluída",
            ServiceOrderStatus::Cancelada => "Cancelada",
        }
    }
}

impl std::fmt::Display for ServiceOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service order priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Priority {
    #[serde(rename = "Baixa")]
    Baixa,
    #[serde(rename = "Média", alias = "Media")]
    Media,
    #[serde(rename = "Alta")]
    Alta,
    #[serde(rename = "Crítica", alias = "Critica")]
    Critica,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Baixa => "Baixa",
            Priority::Media => "Média",
            Priority::Alta => "Alta",
            Priority::Critica => "Crítica",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted service order (collection `service_orders`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceOrder {
    pub id: String,

    /// Human-readable code: `OS` + local date (YYYYMMDD) + 6 hex chars
    pub numero_os: String,

    pub descricao: String,

    pub tipo_servico: String,

    /// Free-text assignee name (not a user reference)
    pub responsavel: String,

    pub prioridade: Priority,

    pub local: String,

    pub equipamento: String,

    #[serde(deserialize_with = "stored_timestamp")]
    pub data_solicitacao: DateTime<Utc>,

    /// Scheduled service time
    #[serde(default, deserialize_with = "optional_stored_timestamp")]
    pub data_atendimento: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: ServiceOrderStatus,

    /// Username of the creator
    pub created_by: String,

    #[serde(deserialize_with = "stored_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl ServiceOrder {
    pub fn new(fields: NewServiceOrder, created_by: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            numero_os: generate_numero_os(),
            descricao: fields.descricao,
            tipo_servico: fields.tipo_servico,
            responsavel: fields.responsavel,
            prioridade: fields.prioridade,
            local: fields.local,
            equipamento: fields.equipamento,
            data_solicitacao: now,
            data_atendimento: fields.data_atendimento,
            status: ServiceOrderStatus::Aberta,
            created_by: created_by.into(),
            updated_at: now,
        }
    }

    /// Merge every field present in the patch and stamp `updated_at`.
    pub fn apply_patch(&mut self, patch: &ServiceOrderPatch, updated_at: DateTime<Utc>) {
        if let Some(ref v) = patch.descricao {
            self.descricao = v.clone();
        }
        if let Some(ref v) = patch.tipo_servico {
            self.tipo_servico = v.clone();
        }
        if let Some(ref v) = patch.responsavel {
            self.responsavel = v.clone();
        }
        if let Some(v) = patch.prioridade {
            self.prioridade = v;
        }
        if let Some(ref v) = patch.local {
            self.local = v.clone();
        }
        if let Some(ref v) = patch.equipamento {
            self.equipamento = v.clone();
        }
        if let Some(v) = patch.data_atendimento {
            self.data_atendimento = Some(v);
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        self.updated_at = updated_at;
    }
}

/// `OS20250831a1b2c3`. Not checked for uniqueness; 24 random bits per day.
pub fn generate_numero_os() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("OS{}{}", Local::now().format("%Y%m%d"), &suffix[..6])
}

/// Fields a client supplies when opening a service order
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewServiceOrder {
    pub descricao: String,
    pub tipo_servico: String,
    pub responsavel: String,
    pub prioridade: Priority,
    pub local: String,
    pub equipamento: String,
    #[serde(default)]
    pub data_atendimento: Option<DateTime<Utc>>,
}

impl NewServiceOrder {
    pub fn validate(&self) -> Result<()> {
        require_text("descricao", &self.descricao)?;
        require_text("tipo_servico", &self.tipo_servico)?;
        require_text("responsavel", &self.responsavel)?;
        require_text("local", &self.local)?;
        require_text("equipamento", &self.equipamento)?;
        Ok(())
    }
}

/// Partial update: absent (or null) fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ServiceOrderPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_servico: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsavel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipamento: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_atendimento: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ServiceOrderStatus>,
}

impl ServiceOrderPatch {
    pub fn validate(&self) -> Result<()> {
        let texts = [
            ("descricao", &self.descricao),
            ("tipo_servico", &self.tipo_servico),
            ("responsavel", &self.responsavel),
            ("local", &self.local),
            ("equipamento", &self.equipamento),
        ];
        for (field, value) in texts {
            if let Some(v) = value {
                require_text(field, v)?;
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.descricao.is_none()
            && self.tipo_servico.is_none()
            && self.responsavel.is_none()
            && self.prioridade.is_none()
            && self.local.is_none()
            && self.equipamento.is_none()
            && self.data_atendimento.is_none()
            && self.status.is_none()
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PlatformError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
