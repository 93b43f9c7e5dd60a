//! Service Order Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, Bson, Document};
use mongodb::{Collection, Database};
use std::collections::BTreeMap;

use super::ServiceOrderRepository;
use crate::domain::{ServiceOrder, ServiceOrderGroupKey, ServiceOrderPatch};
use crate::error::Result;

pub struct MongoServiceOrderRepository {
    collection: Collection<ServiceOrder>,
}

impl MongoServiceOrderRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("service_orders"),
        }
    }
}

#[async_trait]
impl ServiceOrderRepository for MongoServiceOrderRepository {
    async fn insert(&self, order: &ServiceOrder) -> Result<()> {
        self.collection.insert_one(order).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceOrder>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn find_all(&self, limit: i64) -> Result<Vec<ServiceOrder>> {
        let cursor = self.collection.find(doc! {}).limit(limit).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn apply_patch(
        &self,
        id: &str,
        patch: &ServiceOrderPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut set = bson::to_document(patch)?;
        set.insert("updated_at", bson::to_bson(&updated_at)?);

        let result = self.collection
            .update_one(doc! { "id": id }, doc! { "$set": set })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn count_by(&self, key: ServiceOrderGroupKey) -> Result<BTreeMap<String, u64>> {
        let pipeline = vec![doc! {
            "$group": {
                "_id": format!("${}", key.field()),
                "count": { "$sum": 1 },
            }
        }];
        let groups: Vec<Document> = self.collection.aggregate(pipeline).await?.try_collect().await?;
        Ok(fold_groups(groups))
    }
}

/// Turns `{_id, count}` group documents into a map. Groups keyed on a
/// missing or non-string field are skipped.
fn fold_groups(groups: Vec<Document>) -> BTreeMap<String, u64> {
    groups
        .into_iter()
        .filter_map(|group| {
            let key = match group.get("_id") {
                Some(Bson::String(s)) => s.clone(),
                _ => return None,
            };
            let count = match group.get("count") {
                Some(Bson::Int32(n)) => u64::try_from(*n).ok()?,
                Some(Bson::Int64(n)) => u64::try_from(*n).ok()?,
                _ => return None,
            };
            Some((key, count))
        })
        .collect()
}
