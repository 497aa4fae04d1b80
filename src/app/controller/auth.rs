use axum::{extract::State, http::StatusCode};
use wallet_core::AppError;
use wallet_core::auth::Authenticated;
use wallet_core::extract::Json;
use wallet_core::response::{ErrorBody, MessageResponse};

use crate::app::AppState;
use crate::app::middleware::auth::BasicAuthenticator;
use crate::app::request::RegisterRequest;
use crate::app::response::ProfileResponse;
use crate::app::service::account;

pub struct AuthController;

#[wallet_macros::controller(state = AppState, tag = "Auth")]
impl AuthController {
    #[wallet_macros::post("/register")]
    #[wallet_macros::request_body(RegisterRequest)]
    #[wallet_macros::utoipa_response(status = 201, body = MessageResponse, description = "User registered")]
    #[wallet_macros::utoipa_response(status = 400, body = ErrorBody, description = "Missing username or password")]
    #[wallet_macros::utoipa_response(status = 409, body = ErrorBody, description = "Username already taken")]
    pub async fn register(
        State(state): State<AppState>,
        Json(req): Json<RegisterRequest>,
    ) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
        let username = req.username.trim();
        if username.is_empty() || req.password.is_empty() {
            return Err(AppError::BadRequest(
                "username and password are required".into(),
            ));
        }

        let user = account::create_user(&state.db, username, &req.password).await?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");

        Ok((
            StatusCode::CREATED,
            Json(MessageResponse::new("User registered successfully")),
        ))
    }

    #[wallet_macros::get("/me")]
    #[wallet_macros::secured]
    #[wallet_macros::utoipa_response(status = 200, body = ProfileResponse, description = "The authenticated user")]
    #[wallet_macros::utoipa_response(status = 401, body = ErrorBody, description = "Missing or invalid credentials")]
    pub async fn me(
        Authenticated(user): Authenticated<BasicAuthenticator>,
    ) -> Json<ProfileResponse> {
        Json(user.into())
    }
}
