// Favorites by user id in the body. No token required.

use axum::extract::State;
use serde_json::{Map, Value};
use tracing::info;

use crate::api::{JsonBody, PathParam};
use crate::database::{favorites, FavoriteKind};
use crate::error::ApiError;
use crate::handlers::FavoritesBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

fn parse_kind(kind: &str) -> Result<FavoriteKind, ApiError> {
    kind.parse().map_err(ApiError::not_found)
}

/// POST /favorite/:kind - `{user_id, <kind>_id}`
pub async fn add(State(state): State<AppState>, PathParam(kind): PathParam<String>, body: JsonBody) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let user_id = body.i64_field("user_id")?;
    let entity_id = body.i64_field(kind.id_field())?;

    let added = favorites::add_favorite(&state.pool, kind, user_id, entity_id).await?;
    info!(kind = kind.as_str(), user_id, entity_id, "favorite added");

    let mut response = Map::new();
    response.insert(kind.name_field().to_string(), Value::from(added.entity_name));
    response.insert("user".to_string(), Value::from(added.user_name));
    Ok(ApiResponse::created(Value::Object(response)))
}

/// DELETE /favorite/:kind - `{user_id, <kind>_id}`
pub async fn remove(State(state): State<AppState>, PathParam(kind): PathParam<String>, body: JsonBody) -> ApiResult<Value> {
    let kind = parse_kind(&kind)?;
    let user_id = body.i64_field("user_id")?;
    let entity_id = body.i64_field(kind.id_field())?;

    favorites::remove_favorite(&state.pool, kind, user_id, entity_id).await?;
    info!(kind = kind.as_str(), user_id, entity_id, "favorite removed");

    Ok(ApiResponse::success(serde_json::json!({
        "msg": format!("Favorite {} removed successfully", kind.as_str()),
    })))
}

/// POST /favorites - `{user_id}`
pub async fn list(State(state): State<AppState>, body: JsonBody) -> ApiResult<FavoritesBody> {
    let user_id = body.i64_field("user_id")?;
    let favorites = favorites::list_favorites(&state.pool, user_id).await?;
    Ok(ApiResponse::success(FavoritesBody::from(favorites)))
}
