//! Request middleware.
//!
//! - [`auth`]: bearer-token authentication extractor
//! - [`role`]: role gate for admin-only routes
//!
//! # Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies signature, expiry, and the session
//!    purpose tag, then attaches the claims to the request
//! 3. For role-gated routes, [`role::require_admin`] compares the verified
//!    role claim with the required role
//! 4. The handler runs only if every gate passed

pub mod auth;
pub mod role;
