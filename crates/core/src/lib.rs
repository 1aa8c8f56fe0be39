//! Reeltrack domain core.
//!
//! Pure business rules shared by the database and HTTP layers: error type,
//! identifier aliases, entity kinds, status vocabularies, field validation
//! and free-text sanitization. Nothing in this crate touches the database.

pub mod entity;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod sanitize;
pub mod status;
pub mod types;
pub mod validation;
