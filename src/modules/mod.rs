pub mod auth;
pub mod movies;
pub mod uploads;
