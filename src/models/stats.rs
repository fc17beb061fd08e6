//! Denormalized leaderboard statistics embedded in each profile.
//!
//! The whole object is a cache: it is rebuilt from scratch on every sync
//! and only read by the leaderboard. A missing sub-object in an older
//! document deserializes to its zero value, so every key is always present.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// LeetCode problem count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct LeetCodeStats {
    pub solved: u32,
}

/// Codeforces contest rating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct CodeforcesStats {
    pub rating: i32,
    pub max_rating: i32,
}

/// HackerRank badge count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct HackerRankStats {
    pub badges: u32,
}

/// GitHub contributions. Written by the client, never fetched by sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
pub struct GithubStats {
    pub contributions: u32,
}

/// Aggregated statistics for one profile.
///
/// Stored at: `profiles/{user_id}.stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Stats {
    /// Sum of likes across all of the user's projects
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub total_likes: i64,
    pub leetcode: LeetCodeStats,
    pub codeforces: CodeforcesStats,
    pub hackerrank: HackerRankStats,
    pub github: GithubStats,
    /// Cumulative grade point average of the most recent education
    pub cgpa: f64,
}

/// Freshly gathered inputs for a stats rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsSnapshot {
    pub total_likes: i64,
    pub leetcode: LeetCodeStats,
    pub codeforces: CodeforcesStats,
    pub hackerrank: HackerRankStats,
    pub cgpa: f64,
}

impl Stats {
    /// Build the replacement stats object for a profile.
    ///
    /// Everything comes from `snapshot` except GitHub contributions, which
    /// are carried over from `previous`.
    pub fn rebuild(previous: &Stats, snapshot: StatsSnapshot) -> Stats {
        Stats {
            total_likes: snapshot.total_likes,
            leetcode: snapshot.leetcode,
            codeforces: snapshot.codeforces,
            hackerrank: snapshot.hackerrank,
            github: previous.github,
            cgpa: snapshot.cgpa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_keeps_github_and_overwrites_rest() {
        let previous = Stats {
            total_likes: 99,
            leetcode: LeetCodeStats { solved: 500 },
            codeforces: CodeforcesStats {
                rating: 1900,
                max_rating: 2000,
            },
            hackerrank: HackerRankStats { badges: 7 },
            github: GithubStats { contributions: 321 },
            cgpa: 9.1,
        };

        let rebuilt = Stats::rebuild(
            &previous,
            StatsSnapshot {
                total_likes: 10,
                ..Default::default()
            },
        );

        assert_eq!(rebuilt.total_likes, 10);
        assert_eq!(rebuilt.leetcode.solved, 0);
        assert_eq!(rebuilt.codeforces, CodeforcesStats::default());
        assert_eq!(rebuilt.hackerrank.badges, 0);
        assert_eq!(rebuilt.github.contributions, 321);
        assert_eq!(rebuilt.cgpa, 0.0);
    }

    #[test]
    fn test_missing_keys_deserialize_to_zero() {
        let stats: Stats =
            serde_json::from_str(r#"{"totalLikes": 4, "codeforces": {"rating": 1500}}"#).unwrap();

        assert_eq!(stats.total_likes, 4);
        assert_eq!(stats.codeforces.rating, 1500);
        assert_eq!(stats.codeforces.max_rating, 0);
        assert_eq!(stats.leetcode.solved, 0);
        assert_eq!(stats.github.contributions, 0);
    }

    #[test]
    fn test_serializes_every_key() {
        let value = serde_json::to_value(Stats::default()).unwrap();
        for key in [
            "totalLikes",
            "leetcode",
            "codeforces",
            "hackerrank",
            "github",
            "cgpa",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["codeforces"]["maxRating"], 0);
    }
}
