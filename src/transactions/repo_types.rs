use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::BaseEntity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Use,
    Cancel,
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USE" => Ok(Self::Use),
            "CANCEL" => Ok(Self::Cancel),
            other => anyhow::bail!("unknown transaction type `{other}`"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionResultType {
    Success,
    Fail,
}

impl TransactionResultType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Fail => "FAIL",
        }
    }
}

impl FromStr for TransactionResultType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(Self::Success),
            "FAIL" => Ok(Self::Fail),
            other => anyhow::bail!("unknown transaction result type `{other}`"),
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TransactionRow {
    #[sqlx(flatten)]
    pub base: BaseEntity,
    pub account_id: i64,
    pub transaction_type: String,
    pub transaction_result_type: String,
    pub amount: i64,
    pub balance_snapshot: i64,
    pub transaction_id: String,
    pub transacted_at: OffsetDateTime,
}

/// Append-only record of a balance movement on an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub base: BaseEntity,
    pub account_id: i64,
    pub transaction_type: TransactionType,
    pub transaction_result_type: TransactionResultType,
    pub amount: i64,
    pub balance_snapshot: i64, // account balance right after this transaction
    pub transaction_id: String,
    pub transacted_at: OffsetDateTime,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = anyhow::Error;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            transaction_type: r.transaction_type.parse()?,
            transaction_result_type: r.transaction_result_type.parse()?,
            base: r.base,
            account_id: r.account_id,
            amount: r.amount,
            balance_snapshot: r.balance_snapshot,
            transaction_id: r.transaction_id,
            transacted_at: r.transacted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_type_is_stored_by_name() {
        assert_eq!(
            "SUCCESS".parse::<TransactionResultType>().unwrap(),
            TransactionResultType::Success
        );
        assert_eq!(TransactionResultType::Fail.as_str(), "FAIL");
        assert!("S".parse::<TransactionResultType>().is_err());
        assert_eq!(
            serde_json::to_string(&TransactionResultType::Success).unwrap(),
            "\"SUCCESS\""
        );
    }

    #[test]
    fn unknown_transaction_type_is_rejected() {
        let err = "REFUND".parse::<TransactionType>().unwrap_err();
        assert!(err.to_string().contains("REFUND"));
    }
}
