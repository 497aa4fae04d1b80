use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use crate::app::middleware::auth::BasicAuthenticator;

/// Shared by every handler. The connection is the one produced by storage
/// init; nothing else opens one.
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub authenticator: BasicAuthenticator,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        AppState {
            authenticator: BasicAuthenticator::new(db.clone()),
            db,
        }
    }
}
