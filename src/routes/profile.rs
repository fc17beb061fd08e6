// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{CodingProfiles, Profile, ProfileView, SocialLink};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Profile routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(get_profile).put(update_profile))
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub status: String,
    pub data: ProfileView,
}

/// Get the caller's profile.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .store
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;
    let owner = state.store.get_user(&user.user_id).await?;

    Ok(Json(ProfileResponse {
        status: "success".to_string(),
        data: ProfileView::new(profile, owner.as_ref()),
    }))
}

/// Editable profile fields. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 1000))]
    pub bio: Option<String>,
    #[validate(length(max = 120))]
    pub title: Option<String>,
    #[validate(length(max = 20), nested)]
    pub social_links: Option<Vec<SocialLink>>,
    #[validate(url)]
    pub resume: Option<String>,
    #[validate(length(max = 20))]
    pub locations: Option<Vec<String>>,
    #[validate(length(max = 100))]
    pub skills: Option<Vec<String>>,
    #[validate(nested)]
    pub coding_profiles: Option<CodingProfiles>,
}

impl UpdateProfileRequest {
    /// Stats and classification are owned by sync and never touched here.
    fn apply(self, profile: &mut Profile) {
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if let Some(title) = self.title {
            profile.title = title;
        }
        if let Some(links) = self.social_links {
            profile.social_links = links;
        }
        if let Some(resume) = self.resume {
            profile.resume = Some(resume);
        }
        if let Some(locations) = self.locations {
            profile.locations = locations;
        }
        if let Some(mut skills) = self.skills {
            let mut seen = std::collections::HashSet::new();
            skills.retain(|s| seen.insert(s.clone()));
            profile.skills = skills;
        }
        if let Some(coding_profiles) = self.coding_profiles {
            profile.coding_profiles = coding_profiles;
        }
    }
}

/// Update the caller's profile, creating it on first use.
async fn update_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let owner = state
        .store
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let mut profile = match state.store.get_profile(&user.user_id).await? {
        Some(profile) => profile,
        None => {
            tracing::info!(user_id = %user.user_id, "Creating profile on first update");
            Profile::new(&user.user_id)
        }
    };

    body.apply(&mut profile);
    state.store.upsert_profile(&profile).await?;

    Ok(Json(ProfileResponse {
        status: "success".to_string(),
        data: ProfileView::new(profile, Some(&owner)),
    }))
}
