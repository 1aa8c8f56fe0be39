//! Status vocabularies per entity kind.

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

pub const PROJECT_STATUS_ACTIVE: &str = "active";

pub const PROJECT_STATUSES: &[&str] = &[
    PROJECT_STATUS_ACTIVE,
    "bidding",
    "on_hold",
    "completed",
    "archived",
];

// ---------------------------------------------------------------------------
// Episodes, sequences, shots, assets
// ---------------------------------------------------------------------------

pub const TASK_STATUS_WAITING: &str = "waiting";

/// Shared production status of episodes, sequences, shots and assets.
pub const TASK_STATUSES: &[&str] = &[
    TASK_STATUS_WAITING,
    "ready",
    "in_progress",
    "review",
    "approved",
    "final",
    "on_hold",
    "omitted",
];

// ---------------------------------------------------------------------------
// Versions
// ---------------------------------------------------------------------------

pub const VERSION_STATUS_PENDING_REVIEW: &str = "pending_review";

pub const VERSION_STATUSES: &[&str] = &[
    VERSION_STATUS_PENDING_REVIEW,
    "in_review",
    "approved",
    "rejected",
    "revise",
];

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

pub const NOTE_STATUS_OPEN: &str = "open";

pub const NOTE_STATUSES: &[&str] = &[NOTE_STATUS_OPEN, "addressed", "closed"];

// ---------------------------------------------------------------------------
// Asset types
// ---------------------------------------------------------------------------

pub const ASSET_TYPE_OTHER: &str = "other";

pub const ASSET_TYPES: &[&str] = &[
    "character",
    "prop",
    "environment",
    "vehicle",
    "fx",
    "matte_painting",
    ASSET_TYPE_OTHER,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_members_of_their_vocabulary() {
        assert!(PROJECT_STATUSES.contains(&PROJECT_STATUS_ACTIVE));
        assert!(TASK_STATUSES.contains(&TASK_STATUS_WAITING));
        assert!(VERSION_STATUSES.contains(&VERSION_STATUS_PENDING_REVIEW));
        assert!(ASSET_TYPES.contains(&ASSET_TYPE_OTHER));
    }
}
