use anyhow::Context;
use sqlx::PgConnection;

use crate::transactions::repo_types::{Transaction, TransactionRow};

pub async fn find_by_transaction_id(
    conn: &mut PgConnection,
    transaction_id: &str,
) -> anyhow::Result<Option<Transaction>> {
    let row = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT id, created_at, updated_at, account_id, transaction_type,
               transaction_result_type, amount, balance_snapshot,
               transaction_id, transacted_at
          FROM "transaction"
         WHERE transaction_id = $1
        "#,
    )
    .bind(transaction_id)
    .fetch_optional(conn)
    .await
    .context("find transaction by transaction id")?;
    row.map(Transaction::try_from).transpose()
}
