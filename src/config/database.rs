//! PostgreSQL connection pool setup.
//!
//! The connection string is read from `DATABASE_URL`. The pool is created
//! once at startup and cloned into the application state; sqlx reuses
//! connections and reconnects on failure.
//!
//! # Panics
//!
//! [`init_db_pool`] panics when `DATABASE_URL` is unset or the initial
//! connection fails. Startup without a database is not a supported mode.

use sqlx::PgPool;
use std::env;

pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}
