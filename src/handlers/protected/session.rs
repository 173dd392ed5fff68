use axum::extract::{Extension, State};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::database::models::User;
use crate::database::{service, Repository};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// POST /logout - revoke the presented token
///
/// The middleware has already rejected a revoked token, so the ledger
/// insert is always for a live one. Entries for tokens past their own
/// expiry are dropped on the way out.
pub async fn logout(State(state): State<AppState>, Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    service::revoke_token(&state.pool, &auth_user.jti, &auth_user.email, auth_user.exp).await?;
    info!(user_id = auth_user.user_id, jti = %auth_user.jti, "token revoked");

    let pruned = service::prune_revoked_tokens(&state.pool, Utc::now().timestamp()).await?;
    if pruned > 0 {
        debug!(pruned, "pruned expired ledger entries");
    }

    Ok(ApiResponse::success(json!({ "msg": "Token revoked" })))
}

/// GET /protected - the caller's own user record
pub async fn protected(State(state): State<AppState>, Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let user = Repository::<User>::new(state.pool).select_404(auth_user.user_id).await?;

    Ok(ApiResponse::success(json!({
        "msg": format!("Logged in as {}", user.email),
        "user": user,
    })))
}
