use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ApiError;

pub const BODY_REQUIRED: &str = "You need to specify the request body as json object";
pub const BODY_TOO_LARGE: &str = "Request body is too large";

/// A request body that must be a JSON object.
///
/// Absent, malformed and non-object bodies are all rejected with the same
/// 400, before any field is looked at.
#[derive(Debug, Clone)]
pub struct JsonBody(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => ApiError::payload_too_large(BODY_TOO_LARGE),
                _ => ApiError::bad_request(BODY_REQUIRED),
            })?;

        Self::try_from(value)
    }
}

impl TryFrom<Value> for JsonBody {
    type Error = ApiError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ApiError::bad_request(BODY_REQUIRED)),
        }
    }
}

impl JsonBody {
    /// Fails on the first listed field that is absent or null.
    pub fn require(&self, fields: &[&str]) -> Result<(), ApiError> {
        for field in fields {
            match self.0.get(*field) {
                None | Some(Value::Null) => return Err(ApiError::missing_field(*field)),
                Some(_) => {}
            }
        }
        Ok(())
    }

    pub fn i64_field(&self, field: &str) -> Result<i64, ApiError> {
        self.require(&[field])?;
        self.0
            .get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| ApiError::invalid_field(field, "expected an integer"))
    }

    pub fn id(&self) -> Result<i64, ApiError> {
        self.i64_field("id")
    }

    /// Require `fields`, then deserialize the whole body into `T`.
    pub fn parse<T: DeserializeOwned>(&self, fields: &[&str]) -> Result<T, ApiError> {
        self.require(fields)?;
        serde_json::from_value(Value::Object(self.0.clone()))
            .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
    }
}
