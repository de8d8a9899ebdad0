//! Role-based authorization for protected routes.
//!
//! The gate runs after authentication: the [`AuthUser`] extractor verifies
//! the bearer token, then the required role is compared against the role
//! claim by exact match. A mismatch is a 403, distinct from the 401 an
//! invalid token produces.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::middleware::auth::AuthUser;
use crate::modules::auth::model::UserRole;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Middleware for admin-only routes, applied with
/// `middleware::from_fn_with_state(state, require_admin)`.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_role(state, req, next, UserRole::Admin).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn require_role(
    state: AppState,
    req: Request,
    next: Next,
    required_role: UserRole,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_role(&auth_user, required_role)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Compare the verified role claim against a required role. Useful inside
/// handlers that gate only some of their behavior.
pub fn check_role(auth_user: &AuthUser, required_role: UserRole) -> Result<(), AppError> {
    let user_role = parse_role(auth_user.role())?;

    if user_role != required_role {
        return Err(AppError::forbidden(format!(
            "Access denied. Required role: {}",
            required_role.as_str()
        )));
    }

    Ok(())
}

pub fn parse_role(role_str: &str) -> Result<UserRole, AppError> {
    match role_str {
        "user" => Ok(UserRole::User),
        "admin" => Ok(UserRole::Admin),
        _ => Err(AppError::internal(anyhow::anyhow!(
            "Invalid role: {}",
            role_str
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert!(matches!(parse_role("user"), Ok(UserRole::User)));
        assert!(matches!(parse_role("admin"), Ok(UserRole::Admin)));
        assert!(parse_role("superuser").is_err());
        assert!(parse_role("").is_err());
    }
}
