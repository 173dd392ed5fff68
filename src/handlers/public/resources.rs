// Generic CRUD over every `Entity`: one implementation, mounted per table.

use axum::extract::State;
use serde_json::{json, Value};
use tracing::info;

use crate::api::{JsonBody, PathParam};
use crate::database::{Entity, Repository};
use crate::handlers::{keyed, to_value};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /<collection> - every row, ordered by id
pub async fn list<T: Entity>(State(state): State<AppState>) -> ApiResult<Value> {
    let rows = Repository::<T>::new(state.pool).select_all().await?;
    Ok(ApiResponse::success(keyed("ok", T::COLLECTION, to_value(&rows)?)))
}

/// POST /<collection> - every mutable field is required
pub async fn create<T: Entity>(State(state): State<AppState>, body: JsonBody) -> ApiResult<Value> {
    let fields: T::Fields = body.parse(T::FIELDS)?;
    let row = Repository::<T>::new(state.pool).insert(fields).await?;

    info!(table = T::TABLE, id = row.id(), "created");
    Ok(ApiResponse::created(json!({
        "msg": format!("{} created", T::LABEL),
        "id": row.id(),
    })))
}

/// GET /<collection>/:id
pub async fn get_by_id<T: Entity>(State(state): State<AppState>, PathParam(id): PathParam<i64>) -> ApiResult<T> {
    let row = Repository::<T>::new(state.pool).select_404(id).await?;
    Ok(ApiResponse::success(row))
}

/// POST /<collection>/lookup - same as get_by_id, with `{id}` in the body
pub async fn lookup<T: Entity>(State(state): State<AppState>, body: JsonBody) -> ApiResult<T> {
    let id = body.id()?;
    let row = Repository::<T>::new(state.pool).select_404(id).await?;
    Ok(ApiResponse::success(row))
}

/// PUT /<collection> - `{id, ...fields}`; overwrites every mutable field
pub async fn update<T: Entity>(State(state): State<AppState>, body: JsonBody) -> ApiResult<T> {
    let id = body.id()?;
    let fields: T::Fields = body.parse(T::FIELDS)?;
    let row = Repository::<T>::new(state.pool).update(id, fields).await?;

    info!(table = T::TABLE, id, "updated");
    Ok(ApiResponse::success(row))
}

/// DELETE /<collection> - `{id}`
pub async fn delete<T: Entity>(State(state): State<AppState>, body: JsonBody) -> ApiResult<String> {
    let id = body.id()?;
    Repository::<T>::new(state.pool).delete(id).await?;

    info!(table = T::TABLE, id, "deleted");
    Ok(ApiResponse::success(format!("{} deleted", T::LABEL)))
}
