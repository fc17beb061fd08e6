//! Database layer.
//!
//! Handlers talk to a [`Store`]; production runs on Firestore, tests and
//! local development on the in-memory store.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{Education, Profile, ProfileType, Project, Stats, User};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Profiles (keyed by user id)
    pub const PROFILES: &str = "profiles";
    pub const PROJECTS: &str = "projects";
    pub const EDUCATION: &str = "education";
}

/// Typed persistence operations used by the services.
#[async_trait]
pub trait Store: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError>;

    async fn upsert_user(&self, user: &User) -> Result<(), AppError>;

    /// All users, in no particular order.
    async fn list_users(&self) -> Result<Vec<User>, AppError>;

    /// Users for the given IDs; unknown IDs are skipped.
    async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>, AppError>;

    // ─── Profiles ────────────────────────────────────────────────

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError>;

    /// Replace the stats cache and classification of an existing profile.
    ///
    /// Both fields are written together; other profile fields are untouched.
    async fn set_profile_stats(
        &self,
        user_id: &str,
        stats: &Stats,
        profile_type: ProfileType,
    ) -> Result<(), AppError>;

    /// Profiles, optionally restricted to an exact `type`.
    async fn list_profiles(&self, profile_type: Option<&str>) -> Result<Vec<Profile>, AppError>;

    // ─── Projects ────────────────────────────────────────────────

    async fn upsert_project(&self, project: &Project) -> Result<(), AppError>;

    /// Sum of `likes` over the user's projects (0 when there are none).
    async fn total_project_likes(&self, user_id: &str) -> Result<i64, AppError>;

    // ─── Education ───────────────────────────────────────────────

    async fn upsert_education(&self, education: &Education) -> Result<(), AppError>;

    /// Education records for a user, unordered.
    async fn get_education_for_user(&self, user_id: &str) -> Result<Vec<Education>, AppError>;
}
