use anyhow::Context;
use sqlx::PgConnection;

use crate::accounts::repo_types::{Account, AccountRow, NewAccount};

pub async fn find_by_id(conn: &mut PgConnection, id: i64) -> anyhow::Result<Option<Account>> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, created_at, updated_at, user_id, account_number, status,
               balance, registered_at, unregistered_at
          FROM account
         WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
    .context("find account by id")?;
    row.map(Account::try_from).transpose()
}

pub async fn find_by_account_number(
    conn: &mut PgConnection,
    account_number: &str,
) -> anyhow::Result<Option<Account>> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, created_at, updated_at, user_id, account_number, status,
               balance, registered_at, unregistered_at
          FROM account
         WHERE account_number = $1
        "#,
    )
    .bind(account_number)
    .fetch_optional(conn)
    .await
    .context("find account by number")?;
    row.map(Account::try_from).transpose()
}

/// The most recently inserted account, i.e. the one with the highest id.
pub async fn find_latest(conn: &mut PgConnection) -> anyhow::Result<Option<Account>> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, created_at, updated_at, user_id, account_number, status,
               balance, registered_at, unregistered_at
          FROM account
         ORDER BY id DESC
         LIMIT 1
        "#,
    )
    .fetch_optional(conn)
    .await
    .context("find latest account")?;
    row.map(Account::try_from).transpose()
}

pub async fn count_by_user(conn: &mut PgConnection, user_id: i64) -> anyhow::Result<i64> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"SELECT COUNT(*) FROM account WHERE user_id = $1"#,
    )
    .bind(user_id)
    .fetch_one(conn)
    .await
    .context("count accounts by user")?;
    Ok(count)
}

pub async fn list_by_user(conn: &mut PgConnection, user_id: i64) -> anyhow::Result<Vec<Account>> {
    let rows = sqlx::query_as::<_, AccountRow>(
        r#"
        SELECT id, created_at, updated_at, user_id, account_number, status,
               balance, registered_at, unregistered_at
          FROM account
         WHERE user_id = $1
         ORDER BY id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(conn)
    .await
    .context("list accounts by user")?;
    rows.into_iter().map(Account::try_from).collect()
}

pub async fn insert(conn: &mut PgConnection, new: &NewAccount) -> anyhow::Result<Account> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        INSERT INTO account (user_id, account_number, status, balance, registered_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, created_at, updated_at, user_id, account_number, status,
                  balance, registered_at, unregistered_at
        "#,
    )
    .bind(new.user_id)
    .bind(&new.account_number)
    .bind(new.status.as_str())
    .bind(new.balance)
    .bind(new.registered_at)
    .fetch_one(conn)
    .await
    .with_context(|| format!("insert account {}", new.account_number))?;
    Account::try_from(row)
}

/// Write back the mutable columns. `user_id` is never updated.
pub async fn update(conn: &mut PgConnection, account: &Account) -> anyhow::Result<Account> {
    let row = sqlx::query_as::<_, AccountRow>(
        r#"
        UPDATE account
           SET status = $2,
               balance = $3,
               unregistered_at = $4,
               updated_at = now()
         WHERE id = $1
        RETURNING id, created_at, updated_at, user_id, account_number, status,
                  balance, registered_at, unregistered_at
        "#,
    )
    .bind(account.id())
    .bind(account.status.as_str())
    .bind(account.balance)
    .bind(account.unregistered_at)
    .fetch_one(conn)
    .await
    .with_context(|| format!("update account {}", account.account_number))?;
    Account::try_from(row)
}
