//! Material Requisition Workflow
//!
//! `os_id` is stored as given; the referenced order is not looked up.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::domain::{Material, MaterialStatus, MaterialStatusChange, NewMaterial, User};
use crate::error::{PlatformError, Result};
use crate::repository::{MaterialRepository, MAX_BATCH};

const ENTITY: &str = "Material";

pub struct MaterialWorkflow {
    materials: Arc<dyn MaterialRepository>,
}

impl MaterialWorkflow {
    pub fn new(materials: Arc<dyn MaterialRepository>) -> Self {
        Self { materials }
    }

    pub async fn create(&self, fields: NewMaterial, actor: &User) -> Result<Material> {
        fields.validate()?;

        let material = Material::new(fields, &actor.username);
        self.materials.insert(&material).await?;

        info!(
            material_id = %material.id,
            os_id = %material.os_id,
            quantidade = material.quantidade,
            "Material requested"
        );
        Ok(material)
    }

    /// Materials of one order, or all of them. An empty `os_id` means all.
    pub async fn list(&self, os_id: Option<&str>) -> Result<Vec<Material>> {
        let os_id = os_id.filter(|id| !id.is_empty());
        self.materials.find(os_id, MAX_BATCH).await
    }

    pub async fn get(&self, id: &str) -> Result<Material> {
        self.materials
            .find_by_id(id)
            .await?
            .ok_or_else(|| PlatformError::not_found(ENTITY, id))
    }

    /// Set the status. Approval is stamped with the acting user.
    pub async fn update_status(&self, id: &str, status: MaterialStatus, actor: &User) -> Result<Material> {
        let change = MaterialStatusChange::new(status, &actor.username, Utc::now());

        if !self.materials.set_status(id, &change).await? {
            return Err(PlatformError::not_found(ENTITY, id));
        }

        let material = self.get(id).await?;
        info!(material_id = %id, status = %status, actor = %actor.username, "Material status changed");
        Ok(material)
    }
}
