//! Index Bootstrap
//!
//! Creates the indexes the account invariants rely on. Safe to run on
//! every startup; MongoDB treats an existing identical index as a no-op.

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use tracing::info;

use crate::domain::Account;
use crate::error::Result;

/// Ensure the unique email index on `accounts`.
///
/// This index is the safety net for concurrent registration and for the
/// check-then-create admin seeding race: a duplicate write fails with a
/// uniqueness violation instead of corrupting state.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let accounts: Collection<Account> = db.collection("accounts");

    let email_unique = IndexModel::builder()
        .keys(doc! { "email": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();

    accounts.create_index(email_unique).await?;
    info!("Account indexes ensured");

    Ok(())
}
