use chrono::Utc;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, SqlErr};
use wallet_core::AppError;

use crate::app::middleware::auth::hash_password;
use crate::app::model::user;

/// Inserts a user with an empty wallet. The unique index on `username` is
/// the only duplicate check, so concurrent registrations of one name end in
/// exactly one row and a 409 for everybody else.
pub async fn create_user<C: ConnectionTrait>(
    conn: &C,
    username: &str,
    password: &str,
) -> Result<user::Model, AppError> {
    let user = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        balance: Set(0),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(format!("username `{}` is already taken", username))
        }
        _ => err.into(),
    })?;

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::{DatabaseStorage, Storage};

    #[tokio::test]
    async fn second_insert_of_a_name_is_a_conflict() {
        let db = DatabaseStorage::new("sqlite::memory:", 1).init().await.unwrap();

        let user = create_user(&db, "alice", "pw").await.unwrap();
        assert_eq!(user.balance, 0);
        assert_ne!(user.password_hash, "pw");

        let err = create_user(&db, "alice", "other").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
