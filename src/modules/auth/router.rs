use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    forgot_password, get_profile, login, register, reset_password, update_profile, verify_email,
};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(get_profile).patch(update_profile))
        .route("/verify-email", get(verify_email))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}
