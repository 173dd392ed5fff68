pub mod favorites;
pub mod manager;
pub mod models;
pub mod repository;
pub mod service;

pub use favorites::{FavoriteKind, Favorites};
pub use manager::{connect, ensure_schema, health_check, DatabaseError};
pub use repository::{Entity, Repository};
