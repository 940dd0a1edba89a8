use crate::accounts::services::AccountService;
use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::store::{AccountStore, PgStore};
use crate::transactions::services::TransactionService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub transactions: TransactionService,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let db = crate::db::connect(config).await?;

        if let Err(e) = crate::db::migrate(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let store = Arc::new(PgStore::new(db)) as Arc<dyn AccountStore>;
        Ok(Self::from_parts(store, Arc::new(SystemClock)))
    }

    pub fn from_parts(store: Arc<dyn AccountStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            accounts: AccountService::new(store.clone(), clock),
            transactions: TransactionService::new(store),
        }
    }
}
