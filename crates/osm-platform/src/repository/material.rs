//! Material Repository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::{Collection, Database};

use super::MaterialRepository;
use crate::domain::{Material, MaterialStatusChange};
use crate::error::Result;

pub struct MongoMaterialRepository {
    collection: Collection<Material>,
}

impl MongoMaterialRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("materials"),
        }
    }
}

#[async_trait]
impl MaterialRepository for MongoMaterialRepository {
    async fn insert(&self, material: &Material) -> Result<()> {
        self.collection.insert_one(material).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Material>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn find(&self, os_id: Option<&str>, limit: i64) -> Result<Vec<Material>> {
        let filter = match os_id {
            Some(os_id) => doc! { "os_id": os_id },
            None => doc! {},
        };
        let cursor = self.collection.find(filter).limit(limit).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn set_status(&self, id: &str, change: &MaterialStatusChange) -> Result<bool> {
        let mut set = doc! { "status": change.status.as_str() };
        if let Some(ref approval) = change.approval {
            set.insert("aprovado_por", approval.aprovado_por.as_str());
            set.insert("data_aprovacao", bson::to_bson(&approval.data_aprovacao)?);
        }

        let result = self.collection
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}
