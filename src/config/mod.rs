//! Application configuration, loaded from environment variables.
//!
//! - [`cors`]: allowed origins for browser clients
//! - [`database`]: PostgreSQL connection pool initialization
//! - [`email`]: SMTP settings for outgoing notifications
//! - [`jwt`]: signing secret and per-purpose token lifetimes
//! - [`upload`]: upload directories and size limits

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod upload;
