// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every route here is layered with `jwt_auth_middleware`, which rejects
// missing, invalid, expired and revoked tokens before the handler runs.

pub mod favorites;
pub mod session;
