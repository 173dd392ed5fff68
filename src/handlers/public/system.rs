use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::database::health_check;
use crate::state::AppState;

/// GET / - service name, version and route map
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/users, /users/:id, /users/lookup",
            "characters": "/characters, /characters/:id, /characters/lookup",
            "planets": "/planets, /planets/:id, /planets/lookup",
            "vehicles": "/vehicles, /vehicles/:id, /vehicles/lookup",
            "auth": "/register, /login, /logout (bearer), /protected (bearer)",
            "favorites": "/favorite/:kind (people|planet|vehicle), /favorites, /favorites/:user_id (bearer)",
            "health": "/health",
        }
    }))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}
