//! Per-user favorites over characters, planets and vehicles.
//!
//! Each kind has its own join table keyed by `(user_id, <kind>_id)`. The
//! composite primary key is what keeps a pair from being favorited twice.

use std::str::FromStr;

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::manager::{is_unique_violation, DatabaseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteKind {
    People,
    Planet,
    Vehicle,
}

impl FavoriteKind {
    pub const ALL: [FavoriteKind; 3] = [FavoriteKind::People, FavoriteKind::Planet, FavoriteKind::Vehicle];

    pub fn as_str(self) -> &'static str {
        match self {
            FavoriteKind::People => "people",
            FavoriteKind::Planet => "planet",
            FavoriteKind::Vehicle => "vehicle",
        }
    }

    fn join_table(self) -> &'static str {
        match self {
            FavoriteKind::People => "favorite_people",
            FavoriteKind::Planet => "favorite_planets",
            FavoriteKind::Vehicle => "favorite_vehicles",
        }
    }

    fn entity_table(self) -> &'static str {
        match self {
            FavoriteKind::People => "characters",
            FavoriteKind::Planet => "planets",
            FavoriteKind::Vehicle => "vehicles",
        }
    }

    /// Column in the join table, and the body field clients send.
    pub fn id_field(self) -> &'static str {
        match self {
            FavoriteKind::People => "people_id",
            FavoriteKind::Planet => "planet_id",
            FavoriteKind::Vehicle => "vehicle_id",
        }
    }

    /// Response key carrying the favorited entity's name.
    pub fn name_field(self) -> &'static str {
        match self {
            FavoriteKind::People => "people_name",
            FavoriteKind::Planet => "planet_name",
            FavoriteKind::Vehicle => "vehicle_name",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FavoriteKind::People => "Character",
            FavoriteKind::Planet => "Planet",
            FavoriteKind::Vehicle => "Vehicle",
        }
    }
}

impl FromStr for FavoriteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FavoriteKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown favorite kind: {}", s))
    }
}

/// Display names resolved for a newly added favorite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedFavorite {
    pub entity_name: String,
    pub user_name: String,
}

/// A user's favorites as display names, each list in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Favorites {
    pub favorite_people: Vec<String>,
    pub favorite_planets: Vec<String>,
    pub favorite_vehicles: Vec<String>,
}

impl Favorites {
    /// People, then planets, then vehicles.
    pub fn all(&self) -> Vec<String> {
        self.favorite_people
            .iter()
            .chain(&self.favorite_planets)
            .chain(&self.favorite_vehicles)
            .cloned()
            .collect()
    }
}

pub async fn add_favorite(
    pool: &SqlitePool,
    kind: FavoriteKind,
    user_id: i64,
    entity_id: i64,
) -> Result<AddedFavorite, DatabaseError> {
    let entity_name = entity_name(pool, kind, entity_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound(format!("{} not found", kind.label())))?;
    let user_name = user_name(pool, user_id)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))?;

    let sql = format!("INSERT INTO {} (user_id, {}) VALUES (?, ?)", kind.join_table(), kind.id_field());
    debug!(sql = %sql, user_id, entity_id, "query");
    sqlx::query(&sql)
        .bind(user_id)
        .bind(entity_id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DatabaseError::Duplicate("User already has it added to favorites".to_string())
            } else {
                DatabaseError::Sqlx(e)
            }
        })?;

    Ok(AddedFavorite { entity_name, user_name })
}

pub async fn remove_favorite(
    pool: &SqlitePool,
    kind: FavoriteKind,
    user_id: i64,
    entity_id: i64,
) -> Result<(), DatabaseError> {
    let sql = format!("DELETE FROM {} WHERE user_id = ? AND {} = ?", kind.join_table(), kind.id_field());
    debug!(sql = %sql, user_id, entity_id, "query");
    let result = sqlx::query(&sql).bind(user_id).bind(entity_id).execute(pool).await?;
    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound(format!("Favorite {} not found", kind.as_str())));
    }
    Ok(())
}

pub async fn list_favorites(pool: &SqlitePool, user_id: i64) -> Result<Favorites, DatabaseError> {
    if user_name(pool, user_id).await?.is_none() {
        return Err(DatabaseError::NotFound("User not found".to_string()));
    }

    Ok(Favorites {
        favorite_people: favorite_names(pool, FavoriteKind::People, user_id).await?,
        favorite_planets: favorite_names(pool, FavoriteKind::Planet, user_id).await?,
        favorite_vehicles: favorite_names(pool, FavoriteKind::Vehicle, user_id).await?,
    })
}

async fn favorite_names(pool: &SqlitePool, kind: FavoriteKind, user_id: i64) -> Result<Vec<String>, DatabaseError> {
    let sql = format!(
        "SELECT e.name FROM {join} f JOIN {entity} e ON e.id = f.{column} WHERE f.user_id = ? ORDER BY f.rowid",
        join = kind.join_table(),
        entity = kind.entity_table(),
        column = kind.id_field()
    );
    let rows: Vec<(String,)> = sqlx::query_as(&sql).bind(user_id).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

async fn entity_name(pool: &SqlitePool, kind: FavoriteKind, id: i64) -> Result<Option<String>, DatabaseError> {
    let sql = format!("SELECT name FROM {} WHERE id = ?", kind.entity_table());
    let row: Option<(String,)> = sqlx::query_as(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row.map(|(name,)| name))
}

async fn user_name(pool: &SqlitePool, id: i64) -> Result<Option<String>, DatabaseError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT name FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|(name,)| name))
}
