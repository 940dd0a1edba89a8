use serde::Serialize;
use time::OffsetDateTime;

use crate::accounts::repo_types::Account;
use crate::transactions::repo_types::{Transaction, TransactionResultType, TransactionType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDto {
    pub account_number: String,
    pub transaction_type: TransactionType,
    pub transaction_result_type: TransactionResultType,
    pub amount: i64,
    pub balance_snapshot: i64,
    pub transaction_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub transacted_at: OffsetDateTime,
}

impl TransactionDto {
    pub fn from_entity(transaction: &Transaction, account: &Account) -> Self {
        Self {
            account_number: account.account_number.clone(),
            transaction_type: transaction.transaction_type,
            transaction_result_type: transaction.transaction_result_type,
            amount: transaction.amount,
            balance_snapshot: transaction.balance_snapshot,
            transaction_id: transaction.transaction_id.clone(),
            transacted_at: transaction.transacted_at,
        }
    }
}
