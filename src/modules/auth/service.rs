use sqlx::PgPool;
use tracing::{debug, instrument, warn};

use crate::config::jwt::JwtConfig;
use crate::utils::errors::AppError;
use crate::utils::jwt::create_session_token;
use crate::utils::password::{hash_password, verify_password};

use super::model::{LoginRequest, RegisterRequest, UpdateProfileRequest, User};

const USER_COLUMNS: &str = "id, fullname, username, email, role, created_at, updated_at";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(user.email = %dto.email))]
    pub async fn register(db: &PgPool, dto: RegisterRequest) -> Result<User, AppError> {
        let existing = Self::find_by_email(db, &dto.email).await?;
        if existing.is_some() {
            warn!(user.email = %dto.email, "Attempted to register existing email");
            return Err(AppError::conflict("Email is already registered"));
        }

        let hashed_password = hash_password(&dto.password)?;

        let sql = format!(
            "INSERT INTO users (fullname, username, email, password, role)
             VALUES ($1, $2, $3, $4, 'user')
             RETURNING {USER_COLUMNS}"
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.fullname)
            .bind(&dto.username)
            .bind(&dto.email)
            .bind(&hashed_password)
            .fetch_one(db)
            .await
            .map_err(|e| translate_unique_violation(e, "Email is already registered"))?;

        debug!(user.id = %user.id, "User registered");

        Ok(user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(user.email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<(User, String), AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            id: i64,
            fullname: String,
            username: Option<String>,
            email: String,
            password: String,
            role: String,
            created_at: chrono::DateTime<chrono::Utc>,
            updated_at: chrono::DateTime<chrono::Utc>,
        }

        let row = sqlx::query_as::<_, UserWithPassword>(
            "SELECT id, fullname, username, email, password, role, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password"))?;

        let is_valid = verify_password(&dto.password, &row.password)?;
        if !is_valid {
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let user = User {
            id: row.id,
            fullname: row.fullname,
            username: row.username,
            email: row.email,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };

        let token = create_session_token(user.id, &user.email, &user.role, jwt_config)?;

        Ok((user, token))
    }

    pub async fn find_by_id(db: &PgPool, user_id: i64) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(db)
            .await?;
        Ok(user)
    }

    /// Partial profile update. Only the provided fields enter the SET
    /// clause; `updated_at` is refreshed whenever at least one field is
    /// present. Zero provided fields is a caller error.
    #[instrument(skip(db, dto), fields(user.id = %user_id))]
    pub async fn update_profile(
        db: &PgPool,
        user_id: i64,
        dto: UpdateProfileRequest,
    ) -> Result<User, AppError> {
        if dto.is_empty() {
            return Err(AppError::bad_request("No fields to update"));
        }

        let mut sets: Vec<String> = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(fullname) = dto.fullname {
            params.push(fullname);
            sets.push(format!("fullname = ${}", params.len()));
        }

        if let Some(username) = dto.username {
            params.push(username);
            sets.push(format!("username = ${}", params.len()));
        }

        if let Some(email) = dto.email {
            params.push(email);
            sets.push(format!("email = ${}", params.len()));
        }

        if let Some(password) = dto.password {
            params.push(hash_password(&password)?);
            sets.push(format!("password = ${}", params.len()));
        }

        sets.push("updated_at = NOW()".to_string());

        let sql = format!(
            "UPDATE users SET {} WHERE id = ${} RETURNING {USER_COLUMNS}",
            sets.join(", "),
            params.len() + 1
        );

        let mut query = sqlx::query_as::<_, User>(&sql);
        for param in &params {
            query = query.bind(param);
        }

        let user = query
            .bind(user_id)
            .fetch_optional(db)
            .await
            .map_err(|e| translate_unique_violation(e, "Email is already in use"))?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        debug!(user.id = %user.id, "Profile updated");

        Ok(user)
    }

    #[instrument(skip(db, new_password), fields(user.id = %user_id))]
    pub async fn reset_password(
        db: &PgPool,
        user_id: i64,
        new_password: &str,
    ) -> Result<(), AppError> {
        let hashed = hash_password(new_password)?;

        let result = sqlx::query("UPDATE users SET password = $1, updated_at = NOW() WHERE id = $2")
            .bind(&hashed)
            .bind(user_id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("User not found"));
        }

        Ok(())
    }
}

/// A unique-constraint violation on `users` means a duplicate email or
/// username; both surface as a domain conflict, never as a storage error.
fn translate_unique_violation(err: sqlx::Error, email_message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return match db_err.constraint() {
            Some("users_username_key") => AppError::conflict("Username is already taken"),
            _ => AppError::conflict(email_message),
        };
    }
    AppError::from(err)
}
