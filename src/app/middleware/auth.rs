use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use wallet_core::AppError;
use wallet_core::auth::{AuthenticatableUser, Authenticator};

use crate::app::model::user;

impl AuthenticatableUser for user::Model {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }

    fn get_username(&self) -> &str {
        &self.username
    }
}

/// HTTP Basic against the `users` table.
#[derive(Clone)]
pub struct BasicAuthenticator {
    db: DatabaseConnection,
}

impl BasicAuthenticator {
    pub fn new(db: DatabaseConnection) -> Self {
        BasicAuthenticator { db }
    }
}

impl Authenticator for BasicAuthenticator {
    type User = user::Model;

    async fn attempt(&self, username: &str, password: &str) -> Result<user::Model, AppError> {
        let Some(user) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            tracing::debug!(%username, "unknown user");
            return Err(AppError::Unauthorized);
        };

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(%username, "wrong password");
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }
}

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_only_the_original_password() {
        let hash = hash_password("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-phc-string").is_err());
    }
}
