use axum::Router;
use sqlx::PgPool;
use uuid::Uuid;

use chillmovie::config::cors::CorsConfig;
use chillmovie::config::email::EmailConfig;
use chillmovie::config::jwt::JwtConfig;
use chillmovie::config::upload::UploadConfig;
use chillmovie::modules::auth::model::User;
use chillmovie::modules::movies::model::Movie;
use chillmovie::router::init_router;
use chillmovie::state::AppState;
use chillmovie::utils::jwt::create_session_token;
use chillmovie::utils::password::hash_password;

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        session_expiry: 604800,
        verification_expiry: 86400,
        reset_expiry: 3600,
    }
}

fn test_email_config() -> EmailConfig {
    EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@chillmovie.com".to_string(),
        from_name: "Chill Movie".to_string(),
        base_url: "http://localhost:3000".to_string(),
    }
}

pub async fn setup_test_state(pool: PgPool) -> AppState {
    dotenvy::dotenv().ok();

    let upload_config = UploadConfig {
        base_dir: std::env::temp_dir().join(format!("chillmovie-test-{}", Uuid::new_v4())),
    };
    upload_config.ensure_dirs().unwrap();

    AppState {
        db: pool,
        jwt_config: test_jwt_config(),
        email_config: test_email_config(),
        cors_config: CorsConfig::from_env(),
        upload_config,
    }
}

#[allow(dead_code)]
pub async fn setup_test_app(pool: PgPool) -> Router {
    let state = setup_test_state(pool).await;
    init_router(state)
}

/// Seed a user with the given role ("user" or "admin") and return the row.
pub async fn create_test_user(pool: &PgPool, email: &str, password: &str, role: &str) -> User {
    let hashed = hash_password(password).unwrap();

    sqlx::query_as::<_, User>(
        "INSERT INTO users (fullname, username, email, password, role)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id, fullname, username, email, role, created_at, updated_at",
    )
    .bind("Test User")
    .bind(None::<String>)
    .bind(email)
    .bind(hashed)
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Session token for a seeded user, signed with the test secret.
pub fn session_token_for(user: &User) -> String {
    create_session_token(user.id, &user.email, &user.role, &test_jwt_config()).unwrap()
}

#[allow(dead_code)]
pub async fn create_admin_with_token(pool: &PgPool) -> (User, String) {
    let admin = create_test_user(pool, &generate_unique_email(), "Adminpass1", "admin").await;
    let token = session_token_for(&admin);
    (admin, token)
}

#[allow(dead_code)]
pub async fn create_user_with_token(pool: &PgPool) -> (User, String) {
    let user = create_test_user(pool, &generate_unique_email(), "Userpass1", "user").await;
    let token = session_token_for(&user);
    (user, token)
}

#[allow(dead_code)]
pub async fn create_test_movie(
    pool: &PgPool,
    title: &str,
    release_year: Option<i32>,
    rating: Option<f64>,
) -> Movie {
    sqlx::query_as::<_, Movie>(
        "INSERT INTO movies (title, description, release_year, rating, language)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING *",
    )
    .bind(title)
    .bind(None::<String>)
    .bind(release_year)
    .bind(rating)
    .bind(None::<String>)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Seed a genre and attach it to a movie.
#[allow(dead_code)]
pub async fn attach_genre(pool: &PgPool, movie_id: i64, name: &str, slug: &str) -> i64 {
    let genre_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO genres (name, slug) VALUES ($1, $2)
         ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
         RETURNING id",
    )
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(movie_id)
        .bind(genre_id)
        .execute(pool)
        .await
        .unwrap();

    genre_id
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}
