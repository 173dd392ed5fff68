use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A logged-out token. `expires_at` is the token's own `exp` claim (unix seconds).
#[derive(Debug, Clone, FromRow)]
pub struct RevokedToken {
    pub jti: String,
    pub email: String,
    pub revoked_at: DateTime<Utc>,
    pub expires_at: i64,
}
