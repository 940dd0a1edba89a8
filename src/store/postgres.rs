use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Postgres};

use super::{AccountStore, UnitOfWork};
use crate::accounts::{self, repo_types::{Account, NewAccount}};
use crate::transactions::{self, repo_types::Transaction};
use crate::users::{self, repo_types::AccountUser};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let mut tx = self.db.begin().await.context("begin tx")?;
        // Counting a user's accounts and deriving the next number must not
        // interleave with another creation.
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .context("set isolation level")?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

struct PgUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_user(&mut self, user_id: i64) -> anyhow::Result<Option<AccountUser>> {
        users::repo::find_by_id(&mut self.tx, user_id).await
    }

    async fn lock_user(&mut self, user_id: i64) -> anyhow::Result<Option<AccountUser>> {
        users::repo::find_by_id_for_update(&mut self.tx, user_id).await
    }

    async fn find_account(&mut self, id: i64) -> anyhow::Result<Option<Account>> {
        accounts::repo::find_by_id(&mut self.tx, id).await
    }

    async fn find_account_by_number(
        &mut self,
        account_number: &str,
    ) -> anyhow::Result<Option<Account>> {
        accounts::repo::find_by_account_number(&mut self.tx, account_number).await
    }

    async fn count_accounts_by_user(&mut self, user_id: i64) -> anyhow::Result<i64> {
        accounts::repo::count_by_user(&mut self.tx, user_id).await
    }

    async fn find_latest_account(&mut self) -> anyhow::Result<Option<Account>> {
        accounts::repo::find_latest(&mut self.tx).await
    }

    async fn list_accounts_by_user(&mut self, user_id: i64) -> anyhow::Result<Vec<Account>> {
        accounts::repo::list_by_user(&mut self.tx, user_id).await
    }

    async fn insert_account(&mut self, new: NewAccount) -> anyhow::Result<Account> {
        accounts::repo::insert(&mut self.tx, &new).await
    }

    async fn save_account(&mut self, account: &Account) -> anyhow::Result<Account> {
        accounts::repo::update(&mut self.tx, account).await
    }

    async fn find_transaction(
        &mut self,
        transaction_id: &str,
    ) -> anyhow::Result<Option<Transaction>> {
        transactions::repo::find_by_transaction_id(&mut self.tx, transaction_id).await
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        self.tx.commit().await.context("commit tx")
    }
}
