// POST /register and POST /login

use axum::extract::State;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::api::JsonBody;
use crate::auth::{generate_jwt, hash_password, verify_password};
use crate::database::models::NewUser;
use crate::database::service;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

const BAD_CREDENTIALS: &str = "Bad email or password";

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

/// POST /register (also mounted as POST /users)
///
/// Requires `email`, `name`, `password` and `is_active`. The password is
/// stored as a bcrypt hash; a taken email is a 409.
pub async fn register(State(state): State<AppState>, body: JsonBody) -> ApiResult<Value> {
    let mut user: NewUser = body.parse(&["email", "name", "password", "is_active"])?;
    user.password = hash_password(&user.password, state.config.security.bcrypt_cost)?;

    let created = service::insert_user(&state.pool, &user).await?;

    info!(user_id = created.id, "registered user");
    Ok(ApiResponse::created(json!({
        "msg": "User created",
        "id": created.id,
    })))
}

/// POST /login
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login(State(state): State<AppState>, body: JsonBody) -> ApiResult<Value> {
    let credentials: LoginRequest = body.parse(&["email", "password"])?;

    let user = match service::find_user_by_email(&state.pool, &credentials.email).await? {
        Some(user) => user,
        None => {
            warn!("login rejected: unknown email");
            return Err(ApiError::unauthorized(BAD_CREDENTIALS));
        }
    };

    if !verify_password(&credentials.password, &user.password)? {
        warn!(user_id = user.id, "login rejected: wrong password");
        return Err(ApiError::unauthorized(BAD_CREDENTIALS));
    }

    let (token, _) = generate_jwt(&state.config.security, user.id, &user.email)?;

    info!(user_id = user.id, "issued token");
    Ok(ApiResponse::success(json!({
        "token": token,
        "user_id": user.id,
    })))
}
