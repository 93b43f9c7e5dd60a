//! Index bootstrap
//!
//! Creates the collection indexes on startup. Safe to run repeatedly.

use mongodb::bson::{doc, Document};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use tracing::info;

use crate::error::Result;

fn index(keys: Document, name: &str, unique: bool) -> IndexModel {
    let options = IndexOptions::builder()
        .name(name.to_string())
        .unique(unique)
        .build();
    IndexModel::builder().keys(keys).options(options).build()
}

pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let user_indexes = vec![
        index(doc! { "username": 1 }, "idx_username", true),
        index(doc! { "email": 1 }, "idx_email", false),
        index(doc! { "user_type": 1 }, "idx_user_type", false),
    ];
    db.collection::<Document>("users").create_indexes(user_indexes).await?;

    // numero_os stays non-unique: a same-day suffix collision must not reject a write.
    let order_indexes = vec![
        index(doc! { "id": 1 }, "idx_id", true),
        index(doc! { "numero_os": 1 }, "idx_numero_os", false),
        index(doc! { "status": 1 }, "idx_status", false),
        index(doc! { "prioridade": 1 }, "idx_prioridade", false),
        index(doc! { "responsavel": 1 }, "idx_responsavel", false),
        index(doc! { "data_solicitacao": -1 }, "idx_data_solicitacao", false),
        index(doc! { "created_by": 1 }, "idx_created_by", false),
    ];
    db.collection::<Document>("service_orders").create_indexes(order_indexes).await?;

    let material_indexes = vec![
        index(doc! { "id": 1 }, "idx_id", true),
        index(doc! { "os_id": 1 }, "idx_os_id", false),
        index(doc! { "status": 1 }, "idx_status", false),
    ];
    db.collection::<Document>("materials").create_indexes(material_indexes).await?;

    info!(database = %db.name(), "Ensured collection indexes");
    Ok(())
}
