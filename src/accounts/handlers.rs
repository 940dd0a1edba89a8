use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    accounts::dto::{
        AccountDto, AccountInfo, CreateAccountRequest, CreateAccountResponse,
        DeleteAccountRequest, DeleteAccountResponse,
    },
    error::AccountError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", post(create_account).delete(delete_account))
        .route("/accounts/:id", get(get_account))
        .route("/users/:user_id/accounts", get(list_accounts))
}

#[instrument(skip(state))]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AccountDto>, AccountError> {
    let account = state.accounts.get_account(id).await?;
    Ok(Json(AccountDto::from(&account)))
}

#[instrument(skip(state, payload))]
pub async fn create_account(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateAccountResponse>), AccountError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let dto = state
        .accounts
        .create_account(payload.user_id, payload.initial_balance)
        .await?;
    Ok((StatusCode::CREATED, Json(dto.into())))
}

#[instrument(skip(state, payload))]
pub async fn delete_account(
    State(state): State<AppState>,
    payload: Result<Json<DeleteAccountRequest>, JsonRejection>,
) -> Result<Json<DeleteAccountResponse>, AccountError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let dto = state
        .accounts
        .delete_account(payload.user_id, &payload.account_number)
        .await?;
    Ok(Json(dto.into()))
}

#[instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<AccountInfo>>, AccountError> {
    let accounts = state.accounts.list_accounts(user_id).await?;
    Ok(Json(accounts.into_iter().map(AccountInfo::from).collect()))
}
