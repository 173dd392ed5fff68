// handlers/mod.rs - two security tiers
//
// Public handlers need no token. Protected handlers run behind
// `middleware::jwt_auth_middleware` and receive an `AuthUser` extension.
pub mod protected;
pub mod public;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::database::Favorites;
use crate::error::ApiError;

pub(crate) fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| {
        tracing::error!("Failed to serialize response data: {}", e);
        ApiError::internal_server_error("Failed to serialize response data")
    })
}

/// `{"msg": <msg>, <key>: <value>}`
pub(crate) fn keyed(msg: &str, key: &str, value: Value) -> Value {
    let mut body = Map::new();
    body.insert("msg".to_string(), Value::from(msg));
    body.insert(key.to_string(), value);
    Value::Object(body)
}

/// `{msg, favorite_people, favorite_planets, favorite_vehicles, all_favorites}`
#[derive(Debug, Serialize)]
pub struct FavoritesBody {
    msg: &'static str,
    #[serde(flatten)]
    favorites: Favorites,
    all_favorites: Vec<String>,
}

impl From<Favorites> for FavoritesBody {
    fn from(favorites: Favorites) -> Self {
        Self {
            msg: "ok",
            all_favorites: favorites.all(),
            favorites,
        }
    }
}
