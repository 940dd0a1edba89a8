use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::accounts::services::MAX_ACCOUNTS_PER_USER;

/// Every way an account operation can fail.
///
/// Business-rule variants carry a stable code the caller can act on;
/// `Store` wraps infrastructure failures and is never shown verbatim.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("user not found")]
    UserNotFound,

    #[error("account not found")]
    AccountNotFound,

    #[error("transaction not found")]
    TransactionNotFound,

    #[error("a user may own at most {} accounts", MAX_ACCOUNTS_PER_USER)]
    MaxAccountsPerUserExceeded,

    #[error("account does not belong to the user")]
    UserAccountMismatch,

    #[error("account is already unregistered")]
    AccountAlreadyUnregistered,

    #[error("account balance is not empty")]
    BalanceNotEmpty,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl AccountError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_REQUEST",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::AccountNotFound => "ACCOUNT_NOT_FOUND",
            Self::TransactionNotFound => "TRANSACTION_NOT_FOUND",
            Self::MaxAccountsPerUserExceeded => "MAX_ACCOUNT_PER_USER_10",
            Self::UserAccountMismatch => "USER_ACCOUNT_UN_MATCH",
            Self::AccountAlreadyUnregistered => "ACCOUNT_ALREADY_UNREGISTERED",
            Self::BalanceNotEmpty => "BALANCE_NOT_EMPTY",
            Self::Store(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::AccountNotFound | Self::TransactionNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::UserAccountMismatch => StatusCode::FORBIDDEN,
            Self::MaxAccountsPerUserExceeded
            | Self::AccountAlreadyUnregistered
            | Self::BalanceNotEmpty => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for AccountError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidArgument(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: &'static str,
    pub error_message: String,
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match &self {
            Self::Store(e) => {
                error!(error = ?e, "store failure");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse {
            error_code: self.error_code(),
            error_message,
        };
        (status, Json(body)).into_response()
    }
}
