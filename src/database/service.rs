use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::{is_unique_violation, DatabaseError};
use crate::database::models::{NewUser, RevokedToken, User};

/// Insert a user whose `password` is already hashed.
/// The UNIQUE constraint on `email` decides duplicates, so concurrent
/// registrations cannot both succeed.
pub async fn insert_user(pool: &SqlitePool, user: &NewUser) -> Result<User, DatabaseError> {
    sqlx::query_as::<_, User>(
        "INSERT INTO users (email, name, password, is_active)
         VALUES (?, ?, ?, ?)
         RETURNING id, email, name, password, is_active",
    )
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password)
    .bind(user.is_active)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            DatabaseError::Conflict("Email is already registered".to_string())
        } else {
            DatabaseError::Sqlx(e)
        }
    })
}

/// Look up a user by login email
pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, DatabaseError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, email, name, password, is_active
         FROM users
         WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Record a logged-out token. Revoking the same `jti` twice is a no-op.
pub async fn revoke_token(pool: &SqlitePool, jti: &str, email: &str, expires_at: i64) -> Result<(), DatabaseError> {
    sqlx::query(
        "INSERT INTO revoked_tokens (jti, email, revoked_at, expires_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(email)
    .bind(Utc::now())
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// The ledger entry for `jti`, if that token was logged out.
pub async fn find_revoked_token(pool: &SqlitePool, jti: &str) -> Result<Option<RevokedToken>, DatabaseError> {
    let token = sqlx::query_as::<_, RevokedToken>(
        "SELECT jti, email, revoked_at, expires_at
         FROM revoked_tokens
         WHERE jti = ?",
    )
    .bind(jti)
    .fetch_optional(pool)
    .await?;

    Ok(token)
}

/// Drop ledger entries whose token would be rejected as expired anyway.
/// Returns how many were removed.
pub async fn prune_revoked_tokens(pool: &SqlitePool, now: i64) -> Result<u64, DatabaseError> {
    let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
