use axum::extract::{Extension, State};
use tracing::warn;

use crate::api::PathParam;
use crate::database::favorites;
use crate::error::ApiError;
use crate::handlers::FavoritesBody;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

/// GET /favorites/:user_id - only the token's own user may read
///
/// A token for a different user is a 403, not the 401 older clients got;
/// 401 stays reserved for missing, invalid and revoked tokens.
pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    PathParam(user_id): PathParam<i64>,
) -> ApiResult<FavoritesBody> {
    if auth_user.user_id != user_id {
        warn!(caller = auth_user.user_id, requested = user_id, "favorites read denied");
        return Err(ApiError::forbidden("You can only view your own favorites"));
    }

    let favorites = favorites::list_favorites(&state.pool, user_id).await?;
    Ok(ApiResponse::success(FavoritesBody::from(favorites)))
}
