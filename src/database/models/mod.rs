pub mod character;
pub mod planet;
pub mod revoked_token;
pub mod user;
pub mod vehicle;

pub use character::{Character, CharacterFields};
pub use planet::{Planet, PlanetFields};
pub use revoked_token::RevokedToken;
pub use user::{NewUser, User, UserFields};
pub use vehicle::{Vehicle, VehicleFields};
