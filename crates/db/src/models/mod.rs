//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches
//!
//! DTOs carrying free text implement [`reeltrack_core::sanitize::Sanitize`].

pub mod asset;
pub mod episode;
pub mod note;
pub mod playlist;
pub mod project;
pub mod sequence;
pub mod session;
pub mod shot;
pub mod user;
pub mod version;
