// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage)
//! - Credentials (salted password hashes)
//! - Smokes (logged cigarette events)

use chrono::{DateTime, Utc};

use crate::db::collections;
use crate::error::AppError;
use crate::models::{Credentials, SmokeEvent, User};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing
        // a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user profile by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user profile.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Look up login credentials by email.
    ///
    /// Emails are stored lowercased, so at most one document matches.
    pub async fn get_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Credentials>, AppError> {
        let email = email.to_string();
        let matches: Vec<Credentials> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::CREDENTIALS)
            .filter(move |q| q.field("email").eq(email.clone()))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// Store credentials for a user.
    pub async fn set_credentials(&self, credentials: &Credentials) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::CREDENTIALS)
            .document_id(&credentials.user_id)
            .object(credentials)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Smoke Event Operations ──────────────────────────────────

    /// Get a single smoke event by ID.
    pub async fn get_smoke(&self, smoke_id: &str) -> Result<Option<SmokeEvent>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SMOKES)
            .obj()
            .one(smoke_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a smoke event (insert or timestamp edit).
    pub async fn set_smoke(&self, smoke: &SmokeEvent) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SMOKES)
            .document_id(&smoke.smoke_id)
            .object(smoke)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a smoke event.
    pub async fn delete_smoke(&self, smoke_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SMOKES)
            .document_id(smoke_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all smoke events for a user, newest first.
    pub async fn get_smokes_for_user(&self, user_id: &str) -> Result<Vec<SmokeEvent>, AppError> {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SMOKES)
            .filter(move |q| q.field("user_id").eq(user_id.clone()))
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get smoke events for a user at or after a cutoff instant, newest first.
    ///
    /// Timestamps are stored as whole-second RFC3339 strings with a `Z`
    /// suffix (see the write paths in routes), so range filters compare
    /// lexicographically and the cutoff must use the same format.
    pub async fn get_smokes_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<SmokeEvent>, AppError> {
        let user_id = user_id.to_string();
        let since = crate::time_utils::format_utc_rfc3339(since);
        self.get_client()?
            .fluent()
            .select()
            .from(collections::SMOKES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id.clone()),
                    q.field("timestamp").greater_than_or_equal(since.clone()),
                ])
            })
            .order_by([(
                "timestamp",
                firestore::FirestoreQueryDirection::Descending,
            )])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count smoke events for a user at or after a cutoff instant.
    pub async fn count_smokes_since(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u32, AppError> {
        let smokes = self.get_smokes_since(user_id, since).await?;
        Ok(smokes.len() as u32)
    }
}
