use axum::extract::State;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, TransactionTrait};
use wallet_core::AppError;
use wallet_core::auth::Authenticated;
use wallet_core::extract::Json;
use wallet_core::response::ErrorBody;

use crate::app::AppState;
use crate::app::middleware::auth::BasicAuthenticator;
use crate::app::model::transaction::{self, TransactionKind};
use crate::app::model::user;
use crate::app::request::{FundRequest, PayRequest};
use crate::app::response::{BalanceResponse, TransactionResponse};
use crate::app::service::ledger;

pub struct WalletController;

#[wallet_macros::controller(state = AppState, tag = "Wallet")]
impl WalletController {
    #[wallet_macros::post("/fund")]
    #[wallet_macros::secured]
    #[wallet_macros::request_body(FundRequest)]
    #[wallet_macros::utoipa_response(status = 200, body = BalanceResponse, description = "Wallet funded")]
    #[wallet_macros::utoipa_response(status = 400, body = ErrorBody, description = "Invalid amount or balance limit exceeded")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    pub async fn fund(
        State(state): State<AppState>,
        Authenticated(user): Authenticated<BasicAuthenticator>,
        Json(req): Json<FundRequest>,
    ) -> Result<Json<BalanceResponse>, AppError> {
        ledger::validate_amount(req.amount)?;

        let txn = state.db.begin().await?;
        ledger::credit(&txn, user.id, req.amount).await?;
        let balance = ledger::balance_of(&txn, user.id).await?;
        ledger::record(&txn, user.id, TransactionKind::Credit, req.amount, balance, None).await?;
        txn.commit().await?;

        tracing::info!(user_id = user.id, amount = req.amount, "wallet funded");

        Ok(Json(BalanceResponse { balance }))
    }

    #[wallet_macros::post("/pay")]
    #[wallet_macros::secured]
    #[wallet_macros::request_body(PayRequest)]
    #[wallet_macros::utoipa_response(status = 200, body = BalanceResponse, description = "Payment sent")]
    #[wallet_macros::utoipa_response(status = 400, body = ErrorBody, description = "Invalid amount, self payment, insufficient funds or recipient balance limit exceeded")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    #[wallet_macros::utoipa_response(status = 404, body = ErrorBody, description = "Unknown recipient")]
    pub async fn pay(
        State(state): State<AppState>,
        Authenticated(user): Authenticated<BasicAuthenticator>,
        Json(req): Json<PayRequest>,
    ) -> Result<Json<BalanceResponse>, AppError> {
        ledger::validate_amount(req.amount)?;

        let to = req.to.trim();
        if to == user.username {
            return Err(AppError::BadRequest("cannot pay yourself".into()));
        }

        let txn = state.db.begin().await?;

        let recipient = user::Entity::find()
            .filter(user::Column::Username.eq(to))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user `{}` not found", to)))?;

        ledger::transfer(&txn, user.id, recipient.id, req.amount).await?;

        let balance = ledger::balance_of(&txn, user.id).await?;
        let recipient_balance = ledger::balance_of(&txn, recipient.id).await?;

        ledger::record(
            &txn,
            user.id,
            TransactionKind::TransferOut,
            req.amount,
            balance,
            Some(recipient.username.clone()),
        )
        .await?;
        ledger::record(
            &txn,
            recipient.id,
            TransactionKind::TransferIn,
            req.amount,
            recipient_balance,
            Some(user.username.clone()),
        )
        .await?;

        txn.commit().await?;

        tracing::info!(
            from = user.id,
            to = recipient.id,
            amount = req.amount,
            "payment sent"
        );

        Ok(Json(BalanceResponse { balance }))
    }

    #[wallet_macros::get("/bal")]
    #[wallet_macros::secured]
    #[wallet_macros::utoipa_response(status = 200, body = BalanceResponse, description = "Current balance")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    pub async fn balance(
        Authenticated(user): Authenticated<BasicAuthenticator>,
    ) -> Json<BalanceResponse> {
        Json(BalanceResponse {
            balance: user.balance,
        })
    }

    #[wallet_macros::get("/stmt")]
    #[wallet_macros::secured]
    #[wallet_macros::utoipa_response(status = 200, body = Vec<TransactionResponse>, description = "Transactions, newest first")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    pub async fn statement(
        State(state): State<AppState>,
        Authenticated(user): Authenticated<BasicAuthenticator>,
    ) -> Result<Json<Vec<TransactionResponse>>, AppError> {
        let transactions = transaction::Entity::find()
            .filter(transaction::Column::UserId.eq(user.id))
            .order_by_desc(transaction::Column::Id)
            .all(&state.db)
            .await?;

        Ok(Json(
            transactions
                .into_iter()
                .map(TransactionResponse::from)
                .collect(),
        ))
    }
}
