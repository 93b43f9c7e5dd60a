//! User Repository

use async_trait::async_trait;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{bson::doc, Collection, Database};

use super::UserRepository;
use crate::domain::User;
use crate::error::{PlatformError, Result};

const DUPLICATE_KEY: i32 = 11000;

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        match self.collection.insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(PlatformError::duplicate_username(&user.username)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "username": username }).await?)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let count = self.collection
            .count_documents(doc! { "username": username })
            .await?;
        Ok(count > 0)
    }
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}
