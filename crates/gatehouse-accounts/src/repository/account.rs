//! Account Repository

use mongodb::{bson::doc, Collection, Database};

use crate::domain::{Account, Role};
use crate::error::Result;

pub struct AccountRepository {
    collection: Collection<Account>,
}

impl AccountRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("accounts"),
        }
    }

    pub async fn insert(&self, account: &Account) -> Result<()> {
        self.collection.insert_one(account).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Account>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    pub async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "email": email })
            .await?;
        Ok(count > 0)
    }

    pub async fn exists_by_role(&self, role: Role) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "role": role.as_str() })
            .await?;
        Ok(count > 0)
    }

    pub async fn update(&self, account: &Account) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &account.id }, account)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
