use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::database::repository::{Entity, EntityQuery};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub passengers: i64,
    pub length: f64,
    pub cargo_capacity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleFields {
    pub name: String,
    pub passengers: i64,
    pub length: f64,
    pub cargo_capacity: i64,
}

impl Entity for Vehicle {
    const TABLE: &'static str = "vehicles";
    const COLLECTION: &'static str = "vehicles";
    const LABEL: &'static str = "Vehicle";
    const FIELDS: &'static [&'static str] = &["name", "passengers", "length", "cargo_capacity"];
    type Fields = VehicleFields;

    fn id(&self) -> i64 {
        self.id
    }

    fn bind_fields<'q>(fields: VehicleFields, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self> {
        query
            .bind(fields.name)
            .bind(fields.passengers)
            .bind(fields.length)
            .bind(fields.cargo_capacity)
    }
}
