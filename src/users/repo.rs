use anyhow::Context;
use sqlx::PgConnection;

use crate::users::repo_types::AccountUser;

pub async fn find_by_id(
    conn: &mut PgConnection,
    user_id: i64,
) -> anyhow::Result<Option<AccountUser>> {
    let user = sqlx::query_as::<_, AccountUser>(
        r#"
        SELECT id, created_at, updated_at, name
          FROM account_user
         WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("find user by id")?;
    Ok(user)
}

/// Load a user and lock its row until the surrounding transaction ends,
/// so concurrent operations on the same user are serialized.
pub async fn find_by_id_for_update(
    conn: &mut PgConnection,
    user_id: i64,
) -> anyhow::Result<Option<AccountUser>> {
    let user = sqlx::query_as::<_, AccountUser>(
        r#"
        SELECT id, created_at, updated_at, name
          FROM account_user
         WHERE id = $1
           FOR UPDATE
        "#,
    )
    .bind(user_id)
    .fetch_optional(conn)
    .await
    .context("lock user by id")?;
    Ok(user)
}
