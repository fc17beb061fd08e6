// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory store for tests and local development.
//!
//! Each collection is a `DashMap` keyed by document ID, so clones share the
//! same data and every write replaces a whole entry atomically.

use crate::db::Store;
use crate::error::AppError;
use crate::models::{Education, Profile, ProfileType, Project, Stats, User};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory database.
#[derive(Clone, Default)]
pub struct MemoryDb {
    users: Arc<DashMap<String, User>>,
    profiles: Arc<DashMap<String, Profile>>,
    projects: Arc<DashMap<String, Project>>,
    education: Arc<DashMap<String, Education>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryDb {
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(user_id).map(|u| u.value().clone()))
    }

    async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        self.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.iter().map(|u| u.value().clone()).collect())
    }

    async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>, AppError> {
        Ok(user_ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.value().clone()))
            .collect())
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        Ok(self.profiles.get(user_id).map(|p| p.value().clone()))
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        self.profiles.insert(profile.user.clone(), profile.clone());
        Ok(())
    }

    /// A profile deleted since it was read is left deleted.
    async fn set_profile_stats(
        &self,
        user_id: &str,
        stats: &Stats,
        profile_type: ProfileType,
    ) -> Result<(), AppError> {
        if let Some(mut profile) = self.profiles.get_mut(user_id) {
            profile.stats = *stats;
            profile.profile_type = Some(profile_type);
        } else {
            tracing::warn!(user_id, "Profile vanished before stats write");
        }
        Ok(())
    }

    async fn list_profiles(&self, profile_type: Option<&str>) -> Result<Vec<Profile>, AppError> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| match profile_type {
                Some(t) => p.profile_type.map(|pt| pt.as_str()) == Some(t),
                None => true,
            })
            .map(|p| p.value().clone())
            .collect())
    }

    async fn upsert_project(&self, project: &Project) -> Result<(), AppError> {
        self.projects.insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn total_project_likes(&self, user_id: &str) -> Result<i64, AppError> {
        Ok(self
            .projects
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.likes)
            .sum())
    }

    async fn upsert_education(&self, education: &Education) -> Result<(), AppError> {
        self.education
            .insert(education.id.clone(), education.clone());
        Ok(())
    }

    async fn get_education_for_user(&self, user_id: &str) -> Result<Vec<Education>, AppError> {
        Ok(self
            .education
            .iter()
            .filter(|e| e.user_id == user_id)
            .map(|e| e.value().clone())
            .collect())
    }
}
