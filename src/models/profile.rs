//! Profile model: one per user, carrying the leaderboard stats cache.

use serde::{Deserialize, Serialize};
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{Education, Stats, User, UserSummary};

/// Leaderboard classification derived from education history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub enum ProfileType {
    Student,
    Professional,
    Other,
}

impl ProfileType {
    /// Any ongoing record makes the user a student; otherwise any record at
    /// all makes them a professional.
    pub fn classify(records: &[Education]) -> Self {
        if records.is_empty() {
            ProfileType::Other
        } else if records.iter().any(|e| e.current) {
            ProfileType::Student
        } else {
            ProfileType::Professional
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileType::Student => "Student",
            ProfileType::Professional => "Professional",
            ProfileType::Other => "Other",
        }
    }
}

/// A link to one of the user's external pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct SocialLink {
    #[validate(length(min = 1, max = 50))]
    pub platform: String,
    #[validate(url)]
    pub url: String,
}

/// Usernames on external coding platforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct CodingProfiles {
    #[validate(length(max = 100))]
    pub github: Option<String>,
    #[validate(length(max = 100))]
    pub leetcode: Option<String>,
    #[validate(length(max = 100))]
    pub codeforces: Option<String>,
    #[validate(length(max = 100))]
    pub hackerrank: Option<String>,
    #[validate(length(max = 100))]
    pub codechef: Option<String>,
}

impl CodingProfiles {
    /// A handle counts as set only if it is non-blank.
    pub fn handle(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }
}

/// Stored profile.
///
/// Stored at: `profiles/{user_id}`, so there is at most one per user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Owning user ID (also used as document ID)
    pub user: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub social_links: Vec<SocialLink>,
    #[serde(default)]
    pub resume: Option<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    /// Skill IDs
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub coding_profiles: CodingProfiles,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default, rename = "type")]
    pub profile_type: Option<ProfileType>,
}

impl Profile {
    /// Empty profile for a user, with zeroed stats.
    pub fn new(user_id: &str) -> Self {
        Self {
            user: user_id.to_string(),
            ..Default::default()
        }
    }
}

/// Profile as returned by the API, with the owning user expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileView {
    /// `None` if the user record no longer exists
    pub user: Option<UserSummary>,
    pub bio: String,
    pub title: String,
    pub social_links: Vec<SocialLink>,
    pub resume: Option<String>,
    pub locations: Vec<String>,
    pub skills: Vec<String>,
    pub coding_profiles: CodingProfiles,
    pub stats: Stats,
    #[serde(rename = "type")]
    pub profile_type: Option<ProfileType>,
}

impl ProfileView {
    pub fn new(profile: Profile, user: Option<&User>) -> Self {
        Self {
            user: user.map(UserSummary::from),
            bio: profile.bio,
            title: profile.title,
            social_links: profile.social_links,
            resume: profile.resume,
            locations: profile.locations,
            skills: profile.skills,
            coding_profiles: profile.coding_profiles,
            stats: profile.stats,
            profile_type: profile.profile_type,
        }
    }
}
