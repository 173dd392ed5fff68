// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Catalog CRUD, registration, login, the unauthenticated favorites routes
// and the service sitemap/health probes.

pub mod auth;
pub mod favorites;
pub mod resources;
pub mod system;
