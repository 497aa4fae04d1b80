use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::app::model::{product, transaction, user};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub id: i32,
    pub username: String,
    pub balance: i64,
    pub created_at: NaiveDateTime,
}

impl From<user::Model> for ProfileResponse {
    fn from(user: user::Model) -> Self {
        ProfileResponse {
            id: user.id,
            username: user.username,
            balance: user.balance,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BalanceResponse {
    pub balance: i64,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TransactionResponse {
    pub id: i32,
    pub kind: String,
    pub amount: i64,
    pub balance_after: i64,
    pub counterparty: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<transaction::Model> for TransactionResponse {
    fn from(tx: transaction::Model) -> Self {
        TransactionResponse {
            id: tx.id,
            kind: tx.kind,
            amount: tx.amount,
            balance_after: tx.balance_after,
            counterparty: tx.counterparty,
            created_at: tx.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductResponse {
    pub id: i32,
    pub name: String,
    pub price: i64,
    pub description: Option<String>,
}

impl From<product::Model> for ProductResponse {
    fn from(product: product::Model) -> Self {
        ProductResponse {
            id: product.id,
            name: product.name,
            price: product.price,
            description: product.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PurchaseResponse {
    pub balance: i64,
    pub product: ProductResponse,
}
