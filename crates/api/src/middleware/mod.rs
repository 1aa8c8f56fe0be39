//! Request extractors shared by handlers.
//!
//! - [`auth::AuthUser`] -- the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireManager`] -- requires `producer` or `admin`.
//! - [`json::ValidJson`] -- JSON body that is sanitized, then validated.

pub mod auth;
pub mod json;
pub mod rbac;
