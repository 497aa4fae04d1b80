//! Balance movements. Every function takes a generic connection so callers
//! can run several of them inside one database transaction.

use chrono::Utc;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, Set};
use wallet_core::AppError;

use crate::app::model::transaction::{self, TransactionKind};
use crate::app::model::user;

pub fn validate_amount(amount: i64) -> Result<(), AppError> {
    if amount <= 0 {
        return Err(AppError::BadRequest(
            "amount must be a positive integer".into(),
        ));
    }
    Ok(())
}

/// Takes `amount` from the user only if the balance covers it, in a single
/// conditional update. `false` means insufficient funds.
pub async fn debit<C: ConnectionTrait>(conn: &C, user_id: i32, amount: i64) -> Result<bool, DbErr> {
    let result = user::Entity::update_many()
        .col_expr(
            user::Column::Balance,
            Expr::col(user::Column::Balance).sub(amount),
        )
        .filter(user::Column::Id.eq(user_id))
        .filter(user::Column::Balance.gte(amount))
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Adds `amount` to the user unless the balance would leave the `i64` range.
pub async fn credit<C: ConnectionTrait>(conn: &C, user_id: i32, amount: i64) -> Result<(), AppError> {
    let result = user::Entity::update_many()
        .col_expr(
            user::Column::Balance,
            Expr::col(user::Column::Balance).add(amount),
        )
        .filter(user::Column::Id.eq(user_id))
        .filter(user::Column::Balance.lte(i64::MAX.saturating_sub(amount)))
        .exec(conn)
        .await?;

    if result.rows_affected != 1 {
        // distinguishes a full wallet from a missing row
        balance_of(conn, user_id).await?;
        return Err(AppError::BadRequest(
            "amount would exceed the maximum wallet balance".into(),
        ));
    }
    Ok(())
}

/// Moves `amount` between two users. Rows are always touched in ascending id
/// order so two opposite transfers cannot lock each other out.
pub async fn transfer<C: ConnectionTrait>(
    conn: &C,
    from: i32,
    to: i32,
    amount: i64,
) -> Result<(), AppError> {
    let debit_first = from < to;

    if debit_first && !debit(conn, from, amount).await? {
        return Err(AppError::BadRequest("insufficient funds".into()));
    }

    credit(conn, to, amount).await?;

    if !debit_first && !debit(conn, from, amount).await? {
        return Err(AppError::BadRequest("insufficient funds".into()));
    }

    Ok(())
}

pub async fn balance_of<C: ConnectionTrait>(conn: &C, user_id: i32) -> Result<i64, AppError> {
    let user = user::Entity::find_by_id(user_id)
        .one(conn)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {} vanished while reading balance", user_id))?;

    Ok(user.balance)
}

pub async fn record<C: ConnectionTrait>(
    conn: &C,
    user_id: i32,
    kind: TransactionKind,
    amount: i64,
    balance_after: i64,
    counterparty: Option<String>,
) -> Result<transaction::Model, DbErr> {
    transaction::ActiveModel {
        user_id: Set(user_id),
        kind: Set(kind.as_str().to_string()),
        amount: Set(amount),
        balance_after: Set(balance_after),
        counterparty: Set(counterparty),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(conn)
    .await
}
