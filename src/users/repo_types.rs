use serde::Serialize;
use sqlx::FromRow;

use crate::db::BaseEntity;

/// Account holder. Rows are created outside this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct AccountUser {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub base: BaseEntity,
    pub name: String,
}

impl AccountUser {
    pub fn id(&self) -> i64 {
        self.base.id
    }
}
