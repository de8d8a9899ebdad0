use std::env;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Session token lifetime in seconds (default 7 days).
    pub session_expiry: i64,
    /// Email-verification token lifetime in seconds (default 24 hours).
    pub verification_expiry: i64,
    /// Password-reset token lifetime in seconds (default 1 hour).
    pub reset_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiry: env::var("JWT_SESSION_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(604800),
            verification_expiry: env::var("JWT_VERIFICATION_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(86400),
            reset_expiry: env::var("JWT_RESET_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
        }
    }
}
