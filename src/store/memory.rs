use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{AccountStore, UnitOfWork};
use crate::accounts::repo_types::{Account, AccountStatus, NewAccount};
use crate::db::BaseEntity;
use crate::transactions::repo_types::{Transaction, TransactionResultType, TransactionType};
use crate::users::repo_types::AccountUser;

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<i64, AccountUser>,
    accounts: BTreeMap<i64, Account>,
    transactions: BTreeMap<i64, Transaction>,
}

fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().map_or(1, |id| id + 1)
}

fn base(id: i64) -> BaseEntity {
    let now = OffsetDateTime::now_utc();
    BaseEntity {
        id,
        created_at: now,
        updated_at: now,
    }
}

/// Store backed by in-process maps. A unit of work holds the whole store
/// locked and works on a copy that replaces the tables on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    user_locks: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times a unit of work asked for a user row lock.
    pub fn user_locks(&self) -> usize {
        self.user_locks.load(Ordering::SeqCst)
    }

    pub async fn add_user(&self, name: &str) -> AccountUser {
        let mut tables = self.tables.lock().await;
        let user = AccountUser {
            base: base(next_id(&tables.users)),
            name: name.to_string(),
        };
        tables.users.insert(user.id(), user.clone());
        user
    }

    pub async fn add_account(
        &self,
        owner: &AccountUser,
        account_number: &str,
        balance: i64,
        status: AccountStatus,
    ) -> Account {
        let mut tables = self.tables.lock().await;
        let now = OffsetDateTime::now_utc();
        let account = Account {
            base: base(next_id(&tables.accounts)),
            user_id: owner.id(),
            account_number: account_number.to_string(),
            status,
            balance,
            registered_at: now,
            unregistered_at: None,
        };
        tables.accounts.insert(account.id(), account.clone());
        account
    }

    pub async fn add_transaction(
        &self,
        account: &Account,
        transaction_id: &str,
        amount: i64,
        result: TransactionResultType,
    ) -> Transaction {
        let mut tables = self.tables.lock().await;
        let transaction = Transaction {
            base: base(next_id(&tables.transactions)),
            account_id: account.id(),
            transaction_type: TransactionType::Use,
            transaction_result_type: result,
            amount,
            balance_snapshot: account.balance - amount,
            transaction_id: transaction_id.to_string(),
            transacted_at: OffsetDateTime::now_utc(),
        };
        tables
            .transactions
            .insert(transaction.base.id, transaction.clone());
        transaction
    }

    pub async fn account_by_number(&self, account_number: &str) -> Option<Account> {
        let tables = self.tables.lock().await;
        tables
            .accounts
            .values()
            .find(|a| a.account_number == account_number)
            .cloned()
    }

    pub async fn set_balance(&self, account_number: &str, balance: i64) {
        let mut tables = self.tables.lock().await;
        if let Some(account) = tables
            .accounts
            .values_mut()
            .find(|a| a.account_number == account_number)
        {
            account.balance = balance;
        }
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            staged,
            user_locks: self.user_locks.clone(),
        }))
    }
}

struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    user_locks: Arc<AtomicUsize>,
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_user(&mut self, user_id: i64) -> anyhow::Result<Option<AccountUser>> {
        Ok(self.staged.users.get(&user_id).cloned())
    }

    // The whole store is already held exclusively; only the request is counted.
    async fn lock_user(&mut self, user_id: i64) -> anyhow::Result<Option<AccountUser>> {
        self.user_locks.fetch_add(1, Ordering::SeqCst);
        Ok(self.staged.users.get(&user_id).cloned())
    }

    async fn find_account(&mut self, id: i64) -> anyhow::Result<Option<Account>> {
        Ok(self.staged.accounts.get(&id).cloned())
    }

    async fn find_account_by_number(
        &mut self,
        account_number: &str,
    ) -> anyhow::Result<Option<Account>> {
        Ok(self
            .staged
            .accounts
            .values()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    async fn count_accounts_by_user(&mut self, user_id: i64) -> anyhow::Result<i64> {
        let count = self
            .staged
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .count();
        Ok(count as i64)
    }

    async fn find_latest_account(&mut self) -> anyhow::Result<Option<Account>> {
        Ok(self.staged.accounts.values().next_back().cloned())
    }

    async fn list_accounts_by_user(&mut self, user_id: i64) -> anyhow::Result<Vec<Account>> {
        Ok(self
            .staged
            .accounts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_account(&mut self, new: NewAccount) -> anyhow::Result<Account> {
        anyhow::ensure!(
            !self
                .staged
                .accounts
                .values()
                .any(|a| a.account_number == new.account_number),
            "duplicate account number {}",
            new.account_number
        );
        let account = Account {
            base: base(next_id(&self.staged.accounts)),
            user_id: new.user_id,
            account_number: new.account_number,
            status: new.status,
            balance: new.balance,
            registered_at: new.registered_at,
            unregistered_at: None,
        };
        self.staged.accounts.insert(account.id(), account.clone());
        Ok(account)
    }

    async fn save_account(&mut self, account: &Account) -> anyhow::Result<Account> {
        let stored = self
            .staged
            .accounts
            .get_mut(&account.id())
            .ok_or_else(|| anyhow::anyhow!("account {} does not exist", account.id()))?;
        stored.status = account.status;
        stored.balance = account.balance;
        stored.unregistered_at = account.unregistered_at;
        stored.base.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn find_transaction(
        &mut self,
        transaction_id: &str,
    ) -> anyhow::Result<Option<Transaction>> {
        Ok(self
            .staged
            .transactions
            .values()
            .find(|t| t.transaction_id == transaction_id)
            .cloned())
    }

    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let MemoryUnitOfWork { mut guard, staged, .. } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dropped_unit_of_work_discards_writes() {
        let store = MemoryStore::new();
        let user = store.add_user("kim").await;
        let account = store
            .add_account(&user, "1000000000", 0, AccountStatus::InUse)
            .await;

        {
            let mut uow = store.begin().await.unwrap();
            let mut staged = uow.find_account(account.id()).await.unwrap().unwrap();
            staged.unregister(OffsetDateTime::now_utc());
            uow.save_account(&staged).await.unwrap();
        }

        let after = store.account_by_number("1000000000").await.unwrap();
        assert_eq!(after.status, AccountStatus::InUse);
    }

    #[tokio::test]
    async fn committed_unit_of_work_publishes_writes() {
        let store = MemoryStore::new();
        let user = store.add_user("kim").await;

        let mut uow = store.begin().await.unwrap();
        let new = NewAccount::open(&user, "1000000000".into(), 10, OffsetDateTime::now_utc());
        uow.insert_account(new).await.unwrap();
        uow.commit().await.unwrap();

        assert!(store.account_by_number("1000000000").await.is_some());
    }

    #[tokio::test]
    async fn duplicate_account_number_is_rejected() {
        let store = MemoryStore::new();
        let user = store.add_user("kim").await;
        store
            .add_account(&user, "1000000000", 0, AccountStatus::InUse)
            .await;

        let mut uow = store.begin().await.unwrap();
        let new = NewAccount::open(&user, "1000000000".into(), 0, OffsetDateTime::now_utc());
        assert!(uow.insert_account(new).await.is_err());
    }
}
