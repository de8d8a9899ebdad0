use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::middleware::role::require_admin;
use crate::state::AppState;

use super::controller::{create_movie, delete_movie, get_movie_by_id, get_movies, update_movie};

/// Movie routes. The listing needs a valid session (enforced by the
/// `AuthUser` extractor), the detail route is public, and every write is
/// admin-gated.
pub fn init_movies_router(state: AppState) -> Router<AppState> {
    let admin_gate = middleware::from_fn_with_state(state, require_admin);

    Router::new()
        .route("/movies", get(get_movies))
        .route(
            "/movie",
            post(create_movie).route_layer(admin_gate.clone()),
        )
        .route(
            "/movie/{id}",
            get(get_movie_by_id).merge(
                patch(update_movie)
                    .delete(delete_movie)
                    .route_layer(admin_gate),
            ),
        )
}
