// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (identity records)
//! - Profiles (keyed by user id, carrying the stats cache)
//! - Projects (like counters)
//! - Education (grade history)

use crate::db::{collections, Store};
use crate::error::AppError;
use crate::models::{Education, Profile, ProfileType, Project, Stats, User};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::{Deserialize, Serialize};

const MAX_CONCURRENT_DB_OPS: usize = 50;

/// Partial profile document written by a stats sync.
#[derive(Serialize, Deserialize)]
struct ProfileStatsUpdate {
    stats: Stats,
    #[serde(rename = "type")]
    profile_type: ProfileType,
}

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
        // The emulator does not check credentials; skip the real token source.
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

    /// Create an offline client for testing.
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

    /// Fetch one document by ID.
    async fn get_doc<T>(&self, collection: &str, id: &str) -> Result<Option<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collection)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace one document.
    async fn set_doc<T>(&self, collection: &str, id: &str, doc: &T) -> Result<(), AppError>
    where
        T: Serialize + for<'de> Deserialize<'de> + Sync + Send,
    {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collection)
            .document_id(id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// All documents of a collection whose `user_id` field matches.
    async fn query_by_user<T>(&self, collection: &str, user_id: &str) -> Result<Vec<T>, AppError>
    where
        T: for<'de> serde::Deserialize<'de> + Send,
    {
        let user_id = user_id.to_string();
        self.get_client()?
            .fluent()
            .select()
            .from(collection)
            .filter(move |q| q.for_all([q.field("userId").eq(user_id.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[async_trait]
impl Store for FirestoreDb {
    // ─── User Operations ─────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_doc(collections::USERS, user_id).await
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.set_doc(collections::USERS, &user.id, user).await
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Point reads issued concurrently with a limit.
    async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        let users = stream::iter(user_ids.to_vec())
            .map(|id| async move { self.get_user(&id).await })
            .buffered(MAX_CONCURRENT_DB_OPS)
            .collect::<Vec<Result<Option<User>, AppError>>>()
            .await
            .into_iter()
            .collect::<Result<Vec<Option<User>>, AppError>>()?;

        Ok(users.into_iter().flatten().collect())
    }

    // ─── Profile Operations ──────────────────────────────────────

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        self.get_doc(collections::PROFILES, user_id).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.set_doc(collections::PROFILES, &profile.user, profile)
            .await
    }

    /// Single write with an update mask of `stats` and `type`.
    async fn set_profile_stats(
        &self,
        user_id: &str,
        stats: &Stats,
        profile_type: ProfileType,
    ) -> Result<(), AppError> {
        let update = ProfileStatsUpdate {
            stats: *stats,
            profile_type,
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["stats", "type"])
            .in_col(collections::PROFILES)
            .document_id(user_id)
            .object(&update)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    async fn list_profiles(&self, profile_type: Option<&str>) -> Result<Vec<Profile>, AppError> {
        let query = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROFILES);

        let query = if let Some(profile_type) = profile_type {
            let profile_type = profile_type.to_string();
            query.filter(move |q| q.for_all([q.field("type").eq(profile_type.clone())]))
        } else {
            query
        };

        query
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Project Operations ──────────────────────────────────────

    async fn upsert_project(&self, project: &Project) -> Result<(), AppError> {
        self.set_doc(collections::PROJECTS, &project.id, project)
            .await
    }

    async fn total_project_likes(&self, user_id: &str) -> Result<i64, AppError> {
        let projects: Vec<Project> = self.query_by_user(collections::PROJECTS, user_id).await?;
        Ok(projects.iter().map(|p| p.likes).sum())
    }

    // ─── Education Operations ────────────────────────────────────

    async fn upsert_education(&self, education: &Education) -> Result<(), AppError> {
        self.set_doc(collections::EDUCATION, &education.id, education)
            .await
    }

    async fn get_education_for_user(&self, user_id: &str) -> Result<Vec<Education>, AppError> {
        self.query_by_user(collections::EDUCATION, user_id).await
    }
}
