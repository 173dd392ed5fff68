use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, EntityQuery};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    /// bcrypt hash; never leaves the server.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub is_active: bool,
}

/// Registration payload. `password` is plain text until hashed by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password: String,
    pub is_active: bool,
}

/// The only user column editable after registration.
#[derive(Debug, Clone, Deserialize)]
pub struct UserFields {
    pub name: String,
}

impl Entity for User {
    const TABLE: &'static str = "users";
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";
    const FIELDS: &'static [&'static str] = &["name"];
    type Fields = UserFields;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_fields<'q>(fields: UserFields, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query.bind(fields.name)
    }
}
