use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::config::jwt::JwtConfig;
use crate::modules::auth::model::{Claims, TokenPurpose};
use crate::utils::errors::AppError;

/// Issue a signed token carrying the user's identity, role, and a purpose
/// tag. Tokens with different purposes are never interchangeable: the
/// verifier checks the tag, not just the signature.
pub fn create_token(
    user_id: i64,
    email: &str,
    role: &str,
    purpose: TokenPurpose,
    ttl_seconds: i64,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        purpose,
        iat: now,
        exp: now.saturating_add_signed(ttl_seconds as isize),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn create_session_token(
    user_id: i64,
    email: &str,
    role: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    create_token(
        user_id,
        email,
        role,
        TokenPurpose::Session,
        jwt_config.session_expiry,
        jwt_config,
    )
}

/// Verify signature and expiry, then check the purpose tag. A structurally
/// valid token minted for another purpose is rejected the same way as a bad
/// signature.
pub fn verify_token(
    token: &str,
    expected_purpose: TokenPurpose,
    jwt_config: &JwtConfig,
) -> Result<Claims, AppError> {
    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))?;

    if claims.purpose != expected_purpose {
        return Err(AppError::unauthorized("Invalid or expired token"));
    }

    Ok(claims)
}
