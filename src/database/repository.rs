use serde::{de::DeserializeOwned, Serialize};
use sqlx::query::QueryAs;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteRow};
use sqlx::{FromRow, Sqlite};
use tracing::debug;

use crate::database::manager::{is_unique_violation, DatabaseError};

pub type EntityQuery<'q, T> = QueryAs<'q, Sqlite, T, SqliteArguments<'q>>;

/// A table exposed through the uniform CRUD surface.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Serialize + Send + Sync + Unpin + 'static {
    const TABLE: &'static str;
    /// Path segment and list-envelope key, e.g. `characters`.
    const COLLECTION: &'static str;
    /// Singular name used in client messages.
    const LABEL: &'static str;
    /// Mutable columns, in the order `bind_fields` binds them.
    const FIELDS: &'static [&'static str];

    type Fields: DeserializeOwned + Send + 'static;

    fn id(&self) -> i64;

    fn bind_fields<'q>(fields: Self::Fields, query: EntityQuery<'q, Self>) -> EntityQuery<'q, Self>;
}

pub struct Repository<T> {
    pool: SqlitePool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY id", T::TABLE);
        debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn select_one(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", T::TABLE);
        debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i64) -> Result<T, DatabaseError> {
        self.select_one(id).await?.ok_or_else(|| not_found::<T>())
    }

    pub async fn insert(&self, fields: T::Fields) -> Result<T, DatabaseError> {
        let placeholders = vec!["?"; T::FIELDS.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            T::TABLE,
            T::FIELDS.join(", "),
            placeholders
        );
        debug!(sql = %sql, "query");
        let query = T::bind_fields(fields, sqlx::query_as::<_, T>(&sql));
        query.fetch_one(&self.pool).await.map_err(conflict_or::<T>)
    }

    /// Overwrite every mutable column of row `id`.
    pub async fn update(&self, id: i64, fields: T::Fields) -> Result<T, DatabaseError> {
        let assignments = T::FIELDS
            .iter()
            .map(|column| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {} WHERE id = ? RETURNING *", T::TABLE, assignments);
        debug!(sql = %sql, id, "query");
        let query = T::bind_fields(fields, sqlx::query_as::<_, T>(&sql)).bind(id);
        query
            .fetch_optional(&self.pool)
            .await
            .map_err(conflict_or::<T>)?
            .ok_or_else(|| not_found::<T>())
    }

    pub async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(not_found::<T>());
        }
        Ok(())
    }
}

fn not_found<T: Entity>() -> DatabaseError {
    DatabaseError::NotFound(format!("{} not found", T::LABEL))
}

fn conflict_or<T: Entity>(err: sqlx::Error) -> DatabaseError {
    if is_unique_violation(&err) {
        DatabaseError::Conflict(format!("{} already exists", T::LABEL))
    } else {
        DatabaseError::Sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::database::models::{Character, CharacterFields, Vehicle, VehicleFields};
    use crate::database::{connect, ensure_schema};

    async fn pool() -> SqlitePool {
        let pool = connect(&AppConfig::testing().database).await.unwrap();
        ensure_schema(&pool).await.unwrap();
        pool
    }

    fn luke() -> CharacterFields {
        CharacterFields {
            name: "Luke Skywalker".into(),
            birthdate: "19BBY".into(),
            eyes: "blue".into(),
            height: 172,
        }
    }

    #[tokio::test]
    async fn insert_then_select() {
        let repo = Repository::<Character>::new(pool().await);
        let created = repo.insert(luke()).await.unwrap();
        assert_eq!(created.name, "Luke Skywalker");

        let fetched = repo.select_404(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(repo.select_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_overwrites_every_field() {
        let repo = Repository::<Vehicle>::new(pool().await);
        let speeder = repo
            .insert(VehicleFields {
                name: "X-34 landspeeder".into(),
                passengers: 1,
                length: 3.4,
                cargo_capacity: 5,
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                speeder.id,
                VehicleFields {
                    name: "T-16 skyhopper".into(),
                    passengers: 1,
                    length: 10.4,
                    cargo_capacity: 50,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, speeder.id);
        assert_eq!(updated.name, "T-16 skyhopper");
        assert_eq!(updated.length, 10.4);
        assert_eq!(repo.select_404(speeder.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn missing_rows_are_not_found() {
        let repo = Repository::<Character>::new(pool().await);
        assert!(matches!(repo.select_404(42).await, Err(DatabaseError::NotFound(m)) if m == "Character not found"));
        assert!(matches!(repo.update(42, luke()).await, Err(DatabaseError::NotFound(_))));
        assert!(matches!(repo.delete(42).await, Err(DatabaseError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let repo = Repository::<Character>::new(pool().await);
        let created = repo.insert(luke()).await.unwrap();
        repo.delete(created.id).await.unwrap();
        assert!(repo.select_one(created.id).await.unwrap().is_none());
    }
}
