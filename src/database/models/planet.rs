use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, EntityQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Planet {
    pub id: i64,
    pub name: String,
    pub population: i64,
    pub surface: String,
    pub diameter: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanetFields {
    pub name: String,
    pub population: i64,
    pub surface: String,
    pub diameter: i64,
}

impl Entity for Planet {
    const TABLE: &'static str = "planets";
    const COLLECTION: &'static str = "planets";
    const LABEL: &'static str = "Planet";
    const FIELDS: &'static [&'static str] = &["name", "population", "surface", "diameter"];
    type Fields = PlanetFields;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_fields<'q>(fields: PlanetFields, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(fields.name)
            .bind(fields.population)
            .bind(fields.surface)
            .bind(fields.diameter)
    }
}
