use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::{instrument, warn};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::utils::email::EmailService;
use crate::utils::errors::AppError;
use crate::utils::jwt::{create_session_token, create_token, verify_token};
use crate::utils::response::ApiResponse;
use crate::validator::ValidatedJson;

use super::model::{
    AuthData, ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
    TokenPurpose, UpdateProfileRequest, User, VerifyEmailQuery,
};
use super::service::AuthService;

/// Register a new user
///
/// Welcome and verification emails are sent after the user row is
/// committed, on a detached task: a failed delivery is logged and never
/// fails the registration.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered, session token issued", body = AuthData),
        (status = 400, description = "Validation failure"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthData>>), AppError> {
    let user = AuthService::register(&state.db, dto).await?;

    let token = create_session_token(user.id, &user.email, &user.role, &state.jwt_config)?;
    let verification_token = create_token(
        user.id,
        &user.email,
        &user.role,
        TokenPurpose::EmailVerification,
        state.jwt_config.verification_expiry,
        &state.jwt_config,
    )?;

    let email_service = EmailService::new(state.email_config.clone());
    let (to_email, to_name) = (user.email.clone(), user.fullname.clone());
    tokio::spawn(async move {
        if let Err(e) = email_service.send_welcome_email(&to_email, &to_name).await {
            warn!(error = %e, email = %to_email, "Failed to send welcome email");
        }
        if let Err(e) = email_service
            .send_verification_email(&to_email, &to_name, &verification_token)
            .await
        {
            warn!(error = %e, email = %to_email, "Failed to send verification email");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            AuthData { user, token },
            "Registration successful. Check your email to verify your account.",
        )),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthData),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthData>>, AppError> {
    let (user, token) = AuthService::login(&state.db, dto, &state.jwt_config).await?;

    Ok(Json(ApiResponse::with_message(
        AuthData { user, token },
        "Login successful",
    )))
}

/// Get the authenticated user's profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Profile data", body = User),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user))]
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user_id = auth_user.user_id()?;

    let user = AuthService::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(ApiResponse::data(user)))
}

/// Update the authenticated user's profile
#[utoipa::path(
    patch,
    path = "/api/auth/profile",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = User),
        (status = 400, description = "Validation failure or no fields provided"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already in use")
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user_id = auth_user.user_id()?;

    let user = AuthService::update_profile(&state.db, user_id, dto).await?;

    Ok(Json(ApiResponse::with_message(
        user,
        "Profile updated successfully",
    )))
}

/// Verify an email address from the link sent at registration
#[utoipa::path(
    get,
    path = "/api/auth/verify-email",
    params(("token" = Option<String>, Query, description = "Verification token from the email link")),
    responses(
        (status = 200, description = "Email verified"),
        (status = 400, description = "Missing, invalid, expired, or wrong-purpose token"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, query))]
pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyEmailQuery>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let token = query
        .token
        .ok_or_else(|| AppError::bad_request("Verification token is required"))?;

    let claims = verify_token(&token, TokenPurpose::EmailVerification, &state.jwt_config)
        .map_err(|_| AppError::bad_request("Invalid verification token"))?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::bad_request("Invalid verification token"))?;

    AuthService::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Invalid verification token"))?;

    Ok(Json(ApiResponse::message("Email verified successfully")))
}

/// Request a password reset email
///
/// Always answers 200 so the endpoint cannot be used to probe which emails
/// have accounts.
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email sent if the account exists"),
        (status = 400, description = "Validation failure")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    if let Some(user) = AuthService::find_by_email(&state.db, &dto.email).await? {
        let reset_token = create_token(
            user.id,
            &user.email,
            &user.role,
            TokenPurpose::PasswordReset,
            state.jwt_config.reset_expiry,
            &state.jwt_config,
        )?;

        let email_service = EmailService::new(state.email_config.clone());
        let (to_email, to_name) = (user.email.clone(), user.fullname.clone());
        tokio::spawn(async move {
            if let Err(e) = email_service
                .send_password_reset_email(&to_email, &to_name, &reset_token)
                .await
            {
                warn!(error = %e, email = %to_email, "Failed to send password reset email");
            }
        });
    }

    Ok(Json(ApiResponse::message(
        "If an account exists with that email, a password reset link has been sent.",
    )))
}

/// Reset the password with a token from the reset email
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Invalid, expired, or wrong-purpose token"),
        (status = 404, description = "User no longer exists")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let claims = verify_token(&dto.token, TokenPurpose::PasswordReset, &state.jwt_config)
        .map_err(|_| AppError::bad_request("Invalid reset token"))?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::bad_request("Invalid reset token"))?;

    AuthService::reset_password(&state.db, user_id, &dto.password).await?;

    Ok(Json(ApiResponse::message(
        "Password has been reset successfully. You can now log in with your new password.",
    )))
}
