//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Login credentials (keyed by user_id, queried by email)
    pub const CREDENTIALS: &str = "credentials";
    pub const SMOKES: &str = "smokes";
}
