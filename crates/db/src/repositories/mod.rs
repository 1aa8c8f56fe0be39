//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Multi-statement operations
//! (cascade deletes, latest-flag swaps, playlist reordering) run inside a
//! single transaction.

pub mod asset_repo;
pub mod entity_repo;
pub mod episode_repo;
pub mod note_repo;
pub mod playlist_repo;
pub mod project_repo;
pub mod sequence_repo;
pub mod session_repo;
pub mod shot_repo;
pub mod user_repo;
pub mod version_repo;

pub use asset_repo::AssetRepo;
pub use entity_repo::{CascadeSummary, EntityRepo};
pub use episode_repo::EpisodeRepo;
pub use note_repo::NoteRepo;
pub use playlist_repo::PlaylistRepo;
pub use project_repo::ProjectRepo;
pub use sequence_repo::SequenceRepo;
pub use session_repo::SessionRepo;
pub use shot_repo::ShotRepo;
pub use user_repo::UserRepo;
pub use version_repo::VersionRepo;
