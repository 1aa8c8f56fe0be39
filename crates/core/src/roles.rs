//! Well-known role name constants.
//!
//! These must match the `ck_users_role` check constraint in
//! `20260301000002_create_users.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_PRODUCER: &str = "producer";
pub const ROLE_ARTIST: &str = "artist";

/// All assignable roles.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_PRODUCER, ROLE_ARTIST];

/// Role given to self-registered accounts.
pub const DEFAULT_ROLE: &str = ROLE_ARTIST;

/// Whether `role` may delete hierarchy nodes and manage playlists.
pub fn can_manage(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_PRODUCER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_and_producer_can_manage() {
        assert!(can_manage(ROLE_ADMIN));
        assert!(can_manage(ROLE_PRODUCER));
        assert!(!can_manage(ROLE_ARTIST));
        assert!(!can_manage("intern"));
    }
}
