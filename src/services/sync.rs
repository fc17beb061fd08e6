// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard stats synchronization.
//!
//! Handles the sync workflow:
//! 1. Load the caller's profile
//! 2. Sum likes across the caller's projects
//! 3. Fetch LeetCode/Codeforces/HackerRank stats concurrently
//! 4. Derive CGPA and classification from education history
//! 5. Replace the profile's stats cache

use crate::db::Store;
use crate::error::{AppError, Result};
use crate::models::education::sort_most_recent_first;
use crate::models::stats::StatsSnapshot;
use crate::models::{
    CodeforcesStats, CodingProfiles, HackerRankStats, LeetCodeStats, ProfileType, Stats,
};
use crate::services::StatsClient;
use serde::Serialize;

/// Result of a sync, returned to the client as-is.
#[derive(Debug, Clone, Serialize)]
pub struct SyncOutcome {
    pub stats: Stats,
    #[serde(rename = "type")]
    pub profile_type: ProfileType,
}

/// Recompute and persist the stats cache for `user_id`.
///
/// Provider failures never abort the sync; store failures do, and nothing
/// is written in that case.
pub async fn sync_stats(
    store: &dyn Store,
    providers: &StatsClient,
    user_id: &str,
) -> Result<SyncOutcome> {
    tracing::info!(user_id, "Syncing leaderboard stats");

    // 1. Profile must exist; sync never creates one
    let profile = store
        .get_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    // 2. Live sum of project likes
    let total_likes = store.total_project_likes(&profile.user).await?;

    // 3. External stats; unset handles skip the network entirely
    let handles = &profile.coding_profiles;
    let (leetcode, codeforces, hackerrank) = tokio::join!(
        async {
            match CodingProfiles::handle(&handles.leetcode) {
                Some(h) => providers.fetch_leetcode_stats(h).await,
                None => LeetCodeStats::default(),
            }
        },
        async {
            match CodingProfiles::handle(&handles.codeforces) {
                Some(h) => providers.fetch_codeforces_stats(h).await,
                None => CodeforcesStats::default(),
            }
        },
        async {
            match CodingProfiles::handle(&handles.hackerrank) {
                Some(h) => HackerRankStats::from(providers.fetch_hackerrank_stats(h).await),
                None => HackerRankStats::default(),
            }
        },
    );

    // 4-5. Most recent education drives CGPA; any current entry means Student
    let mut education = store.get_education_for_user(&profile.user).await?;
    sort_most_recent_first(&mut education);

    let cgpa = education.first().map(|e| e.cgpa()).unwrap_or(0.0);
    let profile_type = ProfileType::classify(&education);

    // 6. New stats object; GitHub contributions are carried over
    let stats = Stats::rebuild(
        &profile.stats,
        StatsSnapshot {
            total_likes,
            leetcode,
            codeforces,
            hackerrank,
            cgpa,
        },
    );

    // 7. Single write, last sync wins
    store
        .set_profile_stats(&profile.user, &stats, profile_type)
        .await?;

    tracing::info!(
        user_id,
        total_likes,
        leetcode_solved = stats.leetcode.solved,
        codeforces_rating = stats.codeforces.rating,
        hackerrank_badges = stats.hackerrank.badges,
        cgpa,
        profile_type = profile_type.as_str(),
        "Leaderboard stats synced"
    );

    Ok(SyncOutcome {
        stats,
        profile_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::db::MemoryDb;
    use crate::models::{Education, GithubStats, Profile, Project, Semester};

    /// Providers pointed at a closed port; must never be reached in these tests.
    fn offline_providers() -> StatsClient {
        StatsClient::new(&ProviderConfig {
            leetcode_url: "http://127.0.0.1:1".to_string(),
            codeforces_url: "http://127.0.0.1:1".to_string(),
            hackerrank_url: "http://127.0.0.1:1".to_string(),
            timeout: std::time::Duration::from_millis(200),
        })
        .unwrap()
    }

    fn education(id: &str, current: bool, score: Option<&str>) -> Education {
        Education {
            id: id.to_string(),
            user_id: "alice".to_string(),
            institution: "State University".to_string(),
            current,
            score: score.map(String::from),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_missing_profile_is_not_found() {
        let db = MemoryDb::new();
        let err = sync_stats(&db, &offline_providers(), "nobody")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_no_handles_no_projects_no_education() {
        let db = MemoryDb::new();
        db.upsert_profile(&Profile::new("alice")).await.unwrap();

        let outcome = sync_stats(&db, &offline_providers(), "alice")
            .await
            .unwrap();

        assert_eq!(outcome.stats.total_likes, 0);
        assert_eq!(outcome.stats.leetcode.solved, 0);
        assert_eq!(outcome.stats.codeforces, CodeforcesStats::default());
        assert_eq!(outcome.stats.hackerrank.badges, 0);
        assert_eq!(outcome.stats.cgpa, 0.0);
        assert_eq!(outcome.profile_type, ProfileType::Other);

        let stored = db.get_profile("alice").await.unwrap().unwrap();
        assert_eq!(stored.stats, outcome.stats);
        assert_eq!(stored.profile_type, Some(ProfileType::Other));
    }

    #[tokio::test]
    async fn test_likes_summed_and_github_preserved() {
        let db = MemoryDb::new();
        let mut profile = Profile::new("alice");
        profile.stats.github = GithubStats { contributions: 640 };
        profile.stats.total_likes = 1000;
        db.upsert_profile(&profile).await.unwrap();

        for (i, likes) in [3, 5, 2].into_iter().enumerate() {
            db.upsert_project(&Project {
                id: format!("p{i}"),
                user_id: "alice".to_string(),
                title: "Demo".to_string(),
                likes,
            })
            .await
            .unwrap();
        }

        let outcome = sync_stats(&db, &offline_providers(), "alice")
            .await
            .unwrap();

        assert_eq!(outcome.stats.total_likes, 10);
        assert_eq!(outcome.stats.github.contributions, 640);
    }

    #[tokio::test]
    async fn test_one_current_record_makes_student() {
        let db = MemoryDb::new();
        db.upsert_profile(&Profile::new("alice")).await.unwrap();
        db.upsert_education(&education("e1", false, Some("7.0")))
            .await
            .unwrap();
        db.upsert_education(&education("e2", true, None))
            .await
            .unwrap();
        db.upsert_education(&education("e3", false, None))
            .await
            .unwrap();

        let outcome = sync_stats(&db, &offline_providers(), "alice")
            .await
            .unwrap();
        assert_eq!(outcome.profile_type, ProfileType::Student);
    }

    #[tokio::test]
    async fn test_cgpa_from_most_recent_record() {
        use chrono::TimeZone;

        let db = MemoryDb::new();
        db.upsert_profile(&Profile::new("alice")).await.unwrap();

        let mut older = education("old", false, Some("6.5"));
        older.start_date = Some(chrono::Utc.with_ymd_and_hms(2012, 8, 1, 0, 0, 0).unwrap());
        older.end_date = Some(chrono::Utc.with_ymd_and_hms(2016, 5, 1, 0, 0, 0).unwrap());

        let mut newer = education("new", false, None);
        newer.start_date = Some(chrono::Utc.with_ymd_and_hms(2016, 8, 1, 0, 0, 0).unwrap());
        newer.end_date = Some(chrono::Utc.with_ymd_and_hms(2018, 5, 1, 0, 0, 0).unwrap());
        newer.semesters = vec![
            Semester {
                semester: 1,
                sgpa: Some("7".to_string()),
                ..Default::default()
            },
            Semester {
                semester: 2,
                cgpa: Some("8.2".to_string()),
                ..Default::default()
            },
        ];

        db.upsert_education(&older).await.unwrap();
        db.upsert_education(&newer).await.unwrap();

        let outcome = sync_stats(&db, &offline_providers(), "alice")
            .await
            .unwrap();

        assert_eq!(outcome.stats.cgpa, 8.2);
        assert_eq!(outcome.profile_type, ProfileType::Professional);
    }
}
