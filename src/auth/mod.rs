use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub email: String,
    /// Unique token id; the handle logout revokes.
    pub jti: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: i64, email: String, expiry_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            user_id,
            email,
            jti: Uuid::new_v4().to_string(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("{0}")]
    InvalidToken(String),
    #[error(transparent)]
    Hashing(#[from] bcrypt::BcryptError),
}

/// Issue a signed token for `user_id`, returning it with the claims it carries.
pub fn generate_jwt(security: &SecurityConfig, user_id: i64, email: &str) -> Result<(String, Claims), AuthError> {
    if security.jwt_secret.is_empty() {
        return Err(AuthError::TokenGeneration("JWT secret not configured".to_string()));
    }

    let claims = Claims::new(user_id, email.to_string(), security.jwt_expiry_hours);
    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());

    let token = encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))?;
    Ok((token, claims))
}

/// Check signature and expiry, returning the claims.
pub fn validate_jwt(security: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

    Ok(token_data.claims)
}

/// Salted one-way hash for storage.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    Ok(bcrypt::verify(password, hash)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn security() -> SecurityConfig {
        AppConfig::testing().security
    }

    #[test]
    fn issued_token_validates() {
        let security = security();
        let (token, claims) = generate_jwt(&security, 7, "luke@tatooine.org").unwrap();

        let decoded = validate_jwt(&security, &token).unwrap();
        assert_eq!(decoded.user_id, 7);
        assert_eq!(decoded.email, "luke@tatooine.org");
        assert_eq!(decoded.jti, claims.jti);
        assert!(decoded.exp > decoded.iat);
    }

    #[test]
    fn each_token_gets_its_own_id() {
        let security = security();
        let (_, first) = generate_jwt(&security, 1, "a@x.com").unwrap();
        let (_, second) = generate_jwt(&security, 1, "a@x.com").unwrap();
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn rejects_foreign_signature() {
        let security = security();
        let mut other = security.clone();
        other.jwt_secret = "someone-else".to_string();
        let (token, _) = generate_jwt(&other, 1, "a@x.com").unwrap();

        assert!(matches!(validate_jwt(&security, &token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let security = security();
        let mut claims = Claims::new(1, "a@x.com".to_string(), 1);
        claims.exp = Utc::now().timestamp() - 60;
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(security.jwt_secret.as_bytes()),
        )
        .unwrap();

        assert!(matches!(validate_jwt(&security, &token), Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("p", 4).unwrap();
        assert_ne!(hash, "p");
        assert!(verify_password("p", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }
}
