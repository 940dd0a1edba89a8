use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{error::AccountError, state::AppState, transactions::dto::TransactionDto};

pub fn transaction_routes() -> Router<AppState> {
    Router::new().route("/transactions/:transaction_id", get(query_transaction))
}

#[instrument(skip(state))]
pub async fn query_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<TransactionDto>, AccountError> {
    let dto = state.transactions.query_transaction(&transaction_id).await?;
    Ok(Json(dto))
}
