use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use base64::Engine as _;

use crate::error::AppError;

pub trait AuthenticatableUser {
    type Id;

    fn get_id(&self) -> Self::Id;
    fn get_username(&self) -> &str;
}

pub trait Authenticator: Clone + Send + Sync + 'static {
    type User: AuthenticatableUser + Send + Sync + 'static;

    /// Checks a username/password pair. Unknown users and wrong passwords
    /// both resolve to [`AppError::Unauthorized`].
    fn attempt(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<Self::User, AppError>> + Send;
}

/// Decoded `Authorization: Basic ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_header(value: &str) -> Option<Self> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;

        Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Extractor that resolves the calling user through `A`, which must be
/// reachable from the router state.
pub struct Authenticated<A: Authenticator>(pub A::User);

impl<S, A> FromRequestParts<S> for Authenticated<A>
where
    A: Authenticator + FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    #[tracing::instrument(level = "debug", skip_all)]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let authenticator = A::from_ref(state);

        let Some(header) = parts.headers.get(header::AUTHORIZATION) else {
            return Err(AppError::Unauthorized);
        };

        let header = header.to_str().map_err(|_| AppError::Unauthorized)?;
        let credentials = Credentials::from_header(header).ok_or(AppError::Unauthorized)?;

        let user = authenticator
            .attempt(&credentials.username, &credentials.password)
            .await?;

        Ok(Authenticated(user))
    }
}
