//! Persistence boundary for the account service.
//!
//! Every service operation opens one [`UnitOfWork`], performs all of its reads
//! and writes through it and commits at the end. Dropping a unit of work
//! without committing discards everything it wrote.

use async_trait::async_trait;

use crate::accounts::repo_types::{Account, NewAccount};
use crate::transactions::repo_types::Transaction;
use crate::users::repo_types::AccountUser;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>>;
}

#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_user(&mut self, user_id: i64) -> anyhow::Result<Option<AccountUser>>;

    /// Load a user, holding it against concurrent writers until commit or drop.
    async fn lock_user(&mut self, user_id: i64) -> anyhow::Result<Option<AccountUser>>;

    async fn find_account(&mut self, id: i64) -> anyhow::Result<Option<Account>>;

    async fn find_account_by_number(
        &mut self,
        account_number: &str,
    ) -> anyhow::Result<Option<Account>>;

    async fn count_accounts_by_user(&mut self, user_id: i64) -> anyhow::Result<i64>;

    /// The account with the highest id, regardless of owner or status.
    async fn find_latest_account(&mut self) -> anyhow::Result<Option<Account>>;

    async fn list_accounts_by_user(&mut self, user_id: i64) -> anyhow::Result<Vec<Account>>;

    async fn insert_account(&mut self, new: NewAccount) -> anyhow::Result<Account>;

    async fn save_account(&mut self, account: &Account) -> anyhow::Result<Account>;

    async fn find_transaction(
        &mut self,
        transaction_id: &str,
    ) -> anyhow::Result<Option<Transaction>>;

    async fn commit(self: Box<Self>) -> anyhow::Result<()>;
}
