use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_authenticated};
use crate::state::AppState;

/// The full HTTP surface. Gates are bound per route group, never per request.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes(&state))
        .merge(elevated_routes(&state))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(TraceLayer::new_for_http());

    if state.config.security.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/login", post(public::login))
        .route("/users", post(public::register))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    use protected::{favorites, movies, ratings, users};

    Router::new()
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .route("/movies", get(movies::list_movies))
        .route("/movies/:id", get(movies::get))
        .route("/series", get(movies::list_series))
        .route("/ratings", post(ratings::save))
        .route("/ratings/:user_id", get(ratings::list_for_user))
        .route("/favorites", post(favorites::add))
        .route("/favorites/:user_id", get(favorites::get))
        .route("/favorites/:user_id/:favorite_id", axum::routing::delete(favorites::remove))
        .route_layer(from_fn_with_state(state.clone(), require_authenticated))
}

fn elevated_routes(state: &AppState) -> Router<AppState> {
    use elevated::movies;

    Router::new()
        .route("/movies", post(movies::create))
        .route("/movies/:id", axum::routing::delete(movies::delete))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}
