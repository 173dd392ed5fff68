use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post, MethodRouter},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, Environment};
use crate::database::models::{Character, Planet, User, Vehicle};
use crate::database::Entity;
use crate::error::ApiError;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        // Public
        .route("/", get(public::system::root))
        .route("/health", get(public::system::health))
        .merge(auth_public_routes())
        .merge(resource_routes::<User>(post(public::auth::register)))
        .merge(resource_routes::<Character>(post(public::resources::create::<Character>)))
        .merge(resource_routes::<Planet>(post(public::resources::create::<Planet>)))
        .merge(resource_routes::<Vehicle>(post(public::resources::create::<Vehicle>)))
        .merge(favorite_routes())
        // Protected
        .merge(protected_routes(state.clone()))
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TimeoutLayer::new(Duration::from_secs(config.api.request_timeout_secs)))
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes)),
        );

    if let Some(cors) = cors_layer(&config) {
        router = router.layer(cors);
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(public::auth::register))
        .route("/login", post(public::auth::login))
}

/// The uniform CRUD surface for one table. `create` is passed in because
/// users are created through registration.
fn resource_routes<T: Entity>(create: MethodRouter<AppState>) -> Router<AppState> {
    use public::resources;

    let collection = format!("/{}", T::COLLECTION);

    Router::new()
        .route(
            &collection,
            create
                .get(resources::list::<T>)
                .put(resources::update::<T>)
                .delete(resources::delete::<T>),
        )
        .route(&format!("{}/lookup", collection), post(resources::lookup::<T>))
        .route(&format!("{}/:id", collection), get(resources::get_by_id::<T>))
}

fn favorite_routes() -> Router<AppState> {
    use public::favorites;

    Router::new()
        .route("/favorite/:kind", post(favorites::add).delete(favorites::remove))
        .route("/favorites", post(favorites::list))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/logout", post(protected::session::logout))
        .route("/protected", get(protected::session::protected))
        .route("/favorites/:user_id", get(protected::favorites::list_for_user))
        .route_layer(middleware::from_fn_with_state(state, jwt_auth_middleware))
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn cors_layer(config: &AppConfig) -> Option<CorsLayer> {
    if !config.security.enable_cors {
        return None;
    }
    if config.environment == Environment::Development || config.security.cors_origins.is_empty() {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
