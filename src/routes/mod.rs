use axum::Router;
use sea_orm::DatabaseConnection;
use wallet_core::controller::Controller;

use crate::app::AppState;
use crate::app::controller::{AuthController, ProductController, WalletController};

/// The three route groups, in mount order. Prefixing with `/api` happens in
/// the bootstrap.
pub fn routes(db: DatabaseConnection) -> Router {
    let state = AppState::new(db);

    Router::new()
        .merge(AuthController::router(state.clone()))
        .merge(WalletController::router(state.clone()))
        .merge(ProductController::router(state))
}
