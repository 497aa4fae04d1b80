use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set, TransactionTrait};
use wallet_core::AppError;
use wallet_core::auth::Authenticated;
use wallet_core::extract::Json;
use wallet_core::response::ErrorBody;

use crate::app::AppState;
use crate::app::middleware::auth::BasicAuthenticator;
use crate::app::model::product;
use crate::app::model::transaction::TransactionKind;
use crate::app::request::{BuyRequest, CreateProductRequest};
use crate::app::response::{ProductResponse, PurchaseResponse};
use crate::app::service::ledger;

pub struct ProductController;

#[wallet_macros::controller(state = AppState, tag = "Products")]
impl ProductController {
    #[wallet_macros::post("/product")]
    #[wallet_macros::secured]
    #[wallet_macros::request_body(CreateProductRequest)]
    #[wallet_macros::utoipa_response(status = 201, body = ProductResponse, description = "Product added")]
    #[wallet_macros::utoipa_response(status = 400, body = ErrorBody, description = "Missing name or invalid price")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    pub async fn create(
        State(state): State<AppState>,
        Authenticated(user): Authenticated<BasicAuthenticator>,
        Json(req): Json<CreateProductRequest>,
    ) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
        let name = req.name.trim();
        if name.is_empty() {
            return Err(AppError::BadRequest("product name is required".into()));
        }
        if req.price <= 0 {
            return Err(AppError::BadRequest(
                "price must be a positive integer".into(),
            ));
        }

        let product = product::ActiveModel {
            name: Set(name.to_string()),
            price: Set(req.price),
            description: Set(req.description),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(&state.db)
        .await?;

        tracing::info!(product_id = product.id, added_by = user.id, "product added");

        Ok((StatusCode::CREATED, Json(product.into())))
    }

    #[wallet_macros::get("/product")]
    #[wallet_macros::utoipa_response(status = 200, body = Vec<ProductResponse>, description = "All products")]
    pub async fn list(
        State(state): State<AppState>,
    ) -> Result<Json<Vec<ProductResponse>>, AppError> {
        let products = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&state.db)
            .await?;

        Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
    }

    #[wallet_macros::post("/buy")]
    #[wallet_macros::secured]
    #[wallet_macros::request_body(BuyRequest)]
    #[wallet_macros::utoipa_response(status = 200, body = PurchaseResponse, description = "Product bought")]
    #[wallet_macros::utoipa_response(status = 400, body = ErrorBody, description = "Insufficient funds")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    #[wallet_macros::utoipa_response(status = 404, body = ErrorBody, description = "Unknown product")]
    pub async fn buy(
        State(state): State<AppState>,
        Authenticated(user): Authenticated<BasicAuthenticator>,
        Json(req): Json<BuyRequest>,
    ) -> Result<Json<PurchaseResponse>, AppError> {
        let txn = state.db.begin().await?;

        let product = product::Entity::find_by_id(req.product_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("product {} not found", req.product_id)))?;

        if !ledger::debit(&txn, user.id, product.price).await? {
            return Err(AppError::BadRequest("insufficient funds".into()));
        }

        let balance = ledger::balance_of(&txn, user.id).await?;
        ledger::record(
            &txn,
            user.id,
            TransactionKind::Purchase,
            product.price,
            balance,
            Some(product.name.clone()),
        )
        .await?;

        txn.commit().await?;

        tracing::info!(user_id = user.id, product_id = product.id, "product bought");

        Ok(Json(PurchaseResponse {
            balance,
            product: product.into(),
        }))
    }
}
