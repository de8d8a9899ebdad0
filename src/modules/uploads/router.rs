use axum::extract::DefaultBodyLimit;
use axum::{
    Router, middleware,
    routing::{delete, post},
};

use crate::config::upload::MAX_MOVIE_IMAGE_BYTES;
use crate::middleware::role::require_admin;
use crate::state::AppState;

use super::controller::{delete_file, upload_movie_image, upload_profile_image};

pub fn init_uploads_router(state: AppState) -> Router<AppState> {
    let admin_gate = middleware::from_fn_with_state(state, require_admin);

    Router::new()
        .route("/", post(upload_profile_image))
        .route(
            "/movie-image",
            post(upload_movie_image).route_layer(admin_gate.clone()),
        )
        .route(
            "/file/{filename}",
            delete(delete_file).route_layer(admin_gate),
        )
        // Movie images may be up to 50 MB; leave headroom for the
        // multipart framing around the file itself.
        .layer(DefaultBodyLimit::max(MAX_MOVIE_IMAGE_BYTES + 1024 * 1024))
}
