use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, EntityQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub birthdate: String,
    pub eyes: String,
    pub height: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterFields {
    pub name: String,
    pub birthdate: String,
    pub eyes: String,
    pub height: i64,
}

impl Entity for Character {
    const TABLE: &'static str = "characters";
    const COLLECTION: &'static str = "characters";
    const LABEL: &'static str = "Character";
    const FIELDS: &'static [&'static str] = &["name", "birthdate", "eyes", "height"];
    type Fields = CharacterFields;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_fields<'q>(fields: CharacterFields, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(fields.name)
            .bind(fields.birthdate)
            .bind(fields.eyes)
            .bind(fields.height)
    }
}
