// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod education;
pub mod profile;
pub mod project;
pub mod stats;
pub mod user;

pub use education::{Education, Semester};
pub use profile::{CodingProfiles, Profile, ProfileType, ProfileView, SocialLink};
pub use project::Project;
pub use stats::{CodeforcesStats, GithubStats, HackerRankStats, LeetCodeStats, Stats};
pub use user::{User, UserSummary};
