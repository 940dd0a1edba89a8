use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::BaseEntity;
use crate::users::repo_types::AccountUser;

/// Lifecycle status of an account. The only transition is `InUse -> Unregistered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    InUse,
    Unregistered,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InUse => "IN_USE",
            Self::Unregistered => "UNREGISTERED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IN_USE" => Ok(Self::InUse),
            "UNREGISTERED" => Ok(Self::Unregistered),
            other => anyhow::bail!("unknown account status `{other}`"),
        }
    }
}

/// Raw `account` row; `status` is stored as text.
#[derive(Debug, FromRow)]
pub struct AccountRow {
    #[sqlx(flatten)]
    pub base: BaseEntity,
    pub user_id: i64,
    pub account_number: String,
    pub status: String,
    pub balance: i64,
    pub registered_at: OffsetDateTime,
    pub unregistered_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub base: BaseEntity,
    pub user_id: i64, // owner, fixed at creation
    pub account_number: String,
    pub status: AccountStatus,
    pub balance: i64,
    pub registered_at: OffsetDateTime,
    pub unregistered_at: Option<OffsetDateTime>,
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(r: AccountRow) -> Result<Self, Self::Error> {
        Ok(Self {
            status: r.status.parse()?,
            base: r.base,
            user_id: r.user_id,
            account_number: r.account_number,
            balance: r.balance,
            registered_at: r.registered_at,
            unregistered_at: r.unregistered_at,
        })
    }
}

impl Account {
    pub fn id(&self) -> i64 {
        self.base.id
    }

    pub fn is_owned_by(&self, user: &AccountUser) -> bool {
        self.user_id == user.id()
    }

    pub fn is_unregistered(&self) -> bool {
        self.status == AccountStatus::Unregistered
    }

    pub fn unregister(&mut self, now: OffsetDateTime) {
        self.status = AccountStatus::Unregistered;
        self.unregistered_at = Some(now);
    }
}

/// An account that has not been written yet; the store assigns the base columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub user_id: i64,
    pub account_number: String,
    pub status: AccountStatus,
    pub balance: i64,
    pub registered_at: OffsetDateTime,
}

impl NewAccount {
    pub fn open(
        owner: &AccountUser,
        account_number: String,
        initial_balance: i64,
        now: OffsetDateTime,
    ) -> Self {
        Self {
            user_id: owner.id(),
            account_number,
            status: AccountStatus::InUse,
            balance: initial_balance,
            registered_at: now,
        }
    }
}
