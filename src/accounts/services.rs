use std::sync::Arc;

use anyhow::Context;
use tracing::{info, instrument, warn};

use crate::accounts::dto::AccountDto;
use crate::accounts::repo_types::{Account, NewAccount};
use crate::clock::Clock;
use crate::error::AccountError;
use crate::store::AccountStore;
use crate::users::repo_types::AccountUser;

pub const MAX_ACCOUNTS_PER_USER: i64 = 10;
pub const FIRST_ACCOUNT_NUMBER: &str = "1000000000";

/// Account lifecycle: opening, closing and lookups. Holds no state of its own.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    #[instrument(skip(self))]
    pub async fn get_account(&self, id: i64) -> Result<Account, AccountError> {
        if id < 0 {
            return Err(AccountError::invalid_argument("account id must not be negative"));
        }
        let mut uow = self.store.begin().await?;
        let account = uow
            .find_account(id)
            .await?
            .ok_or(AccountError::AccountNotFound)?;
        uow.commit().await?;
        Ok(account)
    }

    #[instrument(skip(self))]
    pub async fn create_account(
        &self,
        user_id: i64,
        initial_balance: i64,
    ) -> Result<AccountDto, AccountError> {
        let mut uow = self.store.begin().await?;
        let user = uow
            .lock_user(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        let owned = uow.count_accounts_by_user(user.id()).await?;
        validate_create_account(&user, owned)?;

        let latest = uow.find_latest_account().await?;
        let account_number = next_account_number(latest.as_ref())?;

        let new = NewAccount::open(&user, account_number, initial_balance, self.clock.now());
        let account = uow.insert_account(new).await?;
        uow.commit().await?;

        info!(
            user_id = user.id(),
            account_number = %account.account_number,
            balance = account.balance,
            "account created"
        );
        Ok(AccountDto::from(&account))
    }

    #[instrument(skip(self))]
    pub async fn delete_account(
        &self,
        user_id: i64,
        account_number: &str,
    ) -> Result<AccountDto, AccountError> {
        let mut uow = self.store.begin().await?;
        let user = uow
            .lock_user(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;
        let mut account = uow
            .find_account_by_number(account_number)
            .await?
            .ok_or(AccountError::AccountNotFound)?;

        validate_delete_account(&user, &account)?;

        account.unregister(self.clock.now());
        let account = uow.save_account(&account).await?;
        uow.commit().await?;

        info!(user_id = user.id(), account_number = %account.account_number, "account unregistered");
        Ok(AccountDto::from(&account))
    }

    #[instrument(skip(self))]
    pub async fn list_accounts(&self, user_id: i64) -> Result<Vec<AccountDto>, AccountError> {
        let mut uow = self.store.begin().await?;
        let user = uow
            .find_user(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;
        let accounts = uow.list_accounts_by_user(user.id()).await?;
        uow.commit().await?;
        Ok(accounts.iter().map(AccountDto::from).collect())
    }
}

fn validate_create_account(user: &AccountUser, owned: i64) -> Result<(), AccountError> {
    if owned >= MAX_ACCOUNTS_PER_USER {
        warn!(user_id = user.id(), owned, "account limit reached");
        return Err(AccountError::MaxAccountsPerUserExceeded);
    }
    Ok(())
}

// Order matters: ownership, then status, then balance.
fn validate_delete_account(user: &AccountUser, account: &Account) -> Result<(), AccountError> {
    if !account.is_owned_by(user) {
        warn!(user_id = user.id(), owner_id = account.user_id, "account owner mismatch");
        return Err(AccountError::UserAccountMismatch);
    }
    if account.is_unregistered() {
        warn!(account_number = %account.account_number, "account already unregistered");
        return Err(AccountError::AccountAlreadyUnregistered);
    }
    if account.balance > 0 {
        warn!(account_number = %account.account_number, balance = account.balance, "balance not empty");
        return Err(AccountError::BalanceNotEmpty);
    }
    Ok(())
}

/// Number for the next account: one past the most recently inserted
/// account's number, or the seed when no account exists.
fn next_account_number(latest: Option<&Account>) -> anyhow::Result<String> {
    match latest {
        Some(account) => {
            let current: u64 = account
                .account_number
                .parse()
                .with_context(|| format!("non-numeric account number {}", account.account_number))?;
            let next = current
                .checked_add(1)
                .context("account number space exhausted")?;
            Ok(next.to_string())
        }
        None => Ok(FIRST_ACCOUNT_NUMBER.to_string()),
    }
}
