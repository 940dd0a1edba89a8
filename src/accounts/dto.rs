use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::accounts::repo_types::{Account, AccountStatus};
use crate::error::AccountError;

/// Projection of an account handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountDto {
    pub user_id: i64,
    pub account_number: String,
    pub balance: i64,
    pub status: AccountStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub unregistered_at: Option<OffsetDateTime>,
}

impl From<&Account> for AccountDto {
    fn from(a: &Account) -> Self {
        Self {
            user_id: a.user_id,
            account_number: a.account_number.clone(),
            balance: a.balance,
            status: a.status,
            registered_at: a.registered_at,
            unregistered_at: a.unregistered_at,
        }
    }
}

pub(crate) fn is_valid_account_number(account_number: &str) -> bool {
    lazy_static! {
        static ref ACCOUNT_NUMBER_RE: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    }
    ACCOUNT_NUMBER_RE.is_match(account_number)
}

fn validate_user_id(user_id: i64) -> Result<(), AccountError> {
    if user_id < 1 {
        return Err(AccountError::invalid_argument("user_id must be positive"));
    }
    Ok(())
}

/// Request body for opening an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub user_id: i64,
    pub initial_balance: i64,
}

impl CreateAccountRequest {
    pub fn validate(&self) -> Result<(), AccountError> {
        validate_user_id(self.user_id)?;
        if self.initial_balance < 0 {
            return Err(AccountError::invalid_argument(
                "initial_balance must not be negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub user_id: i64,
    pub account_number: String,
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

impl From<AccountDto> for CreateAccountResponse {
    fn from(dto: AccountDto) -> Self {
        Self {
            user_id: dto.user_id,
            account_number: dto.account_number,
            registered_at: dto.registered_at,
        }
    }
}

/// Request body for closing an account.
#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub user_id: i64,
    pub account_number: String,
}

impl DeleteAccountRequest {
    pub fn validate(&self) -> Result<(), AccountError> {
        validate_user_id(self.user_id)?;
        if !is_valid_account_number(&self.account_number) {
            return Err(AccountError::invalid_argument(
                "account_number must be exactly 10 digits",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub user_id: i64,
    pub account_number: String,
    #[serde(with = "time::serde::rfc3339::option")]
    pub unregistered_at: Option<OffsetDateTime>,
}

impl From<AccountDto> for DeleteAccountResponse {
    fn from(dto: AccountDto) -> Self {
        Self {
            user_id: dto.user_id,
            account_number: dto.account_number,
            unregistered_at: dto.unregistered_at,
        }
    }
}

/// Item of a user's account listing.
#[derive(Debug, Serialize)]
pub struct AccountInfo {
    pub account_number: String,
    pub balance: i64,
}

impl From<AccountDto> for AccountInfo {
    fn from(dto: AccountDto) -> Self {
        Self {
            account_number: dto.account_number,
            balance: dto.balance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_number_must_be_ten_digits() {
        assert!(is_valid_account_number("1000000000"));
        assert!(!is_valid_account_number("100000000"));
        assert!(!is_valid_account_number("10000000000"));
        assert!(!is_valid_account_number("10000a0000"));
        assert!(!is_valid_account_number(""));
    }

    #[test]
    fn create_request_rejects_negative_balance() {
        let req = CreateAccountRequest {
            user_id: 1,
            initial_balance: -1,
        };
        assert!(matches!(req.validate(), Err(AccountError::InvalidArgument(_))));
    }

    #[test]
    fn create_request_accepts_zero_balance() {
        let req = CreateAccountRequest {
            user_id: 1,
            initial_balance: 0,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn delete_request_rejects_non_positive_user() {
        let req = DeleteAccountRequest {
            user_id: 0,
            account_number: "1000000000".into(),
        };
        assert!(matches!(req.validate(), Err(AccountError::InvalidArgument(_))));
    }
}
