use std::sync::Arc;

use tracing::instrument;

use crate::error::AccountError;
use crate::store::AccountStore;
use crate::transactions::dto::TransactionDto;

/// Read access to recorded transactions.
#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn AccountStore>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    #[instrument(skip(self))]
    pub async fn query_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<TransactionDto, AccountError> {
        let mut uow = self.store.begin().await?;
        let transaction = uow
            .find_transaction(transaction_id)
            .await?
            .ok_or(AccountError::TransactionNotFound)?;
        let account = uow
            .find_account(transaction.account_id)
            .await?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "transaction {} references missing account {}",
                    transaction.transaction_id,
                    transaction.account_id
                )
            })?;
        uow.commit().await?;
        Ok(TransactionDto::from_entity(&transaction, &account))
    }
}
