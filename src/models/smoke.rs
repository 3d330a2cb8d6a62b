// SPDX-License-Identifier: MIT

//! Smoke event model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged cigarette, stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmokeEvent {
    /// Event ID (UUIDv4, also used as document ID)
    pub smoke_id: String,
    /// Owning user ID
    pub user_id: String,
    /// When the cigarette was smoked (never in the future)
    pub timestamp: DateTime<Utc>,
}

impl SmokeEvent {
    /// Create a new event with a fresh ID.
    pub fn new(user_id: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            smoke_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            timestamp,
        }
    }
}
