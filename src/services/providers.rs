// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Clients for the external coding-platform stat providers.
//!
//! Handles:
//! - LeetCode solved-problem count (GraphQL)
//! - Codeforces rating (REST)
//! - HackerRank badges (REST)
//!
//! The public `fetch_*` methods never fail. Any transport error, timeout,
//! non-2xx status or unexpected payload is logged and turned into a zeroed
//! record of the same shape.

use crate::config::ProviderConfig;
use crate::error::AppError;
use crate::models::{CodeforcesStats, HackerRankStats, LeetCodeStats};
use serde::Deserialize;

const LEETCODE_SOLVED_QUERY: &str = "
query userProblemsSolved($username: String!) {
  matchedUser(username: $username) {
    submitStatsGlobal {
      acSubmissionNum {
        difficulty
        count
      }
    }
  }
}";

/// HackerRank badge summary. `points` is not computed and always 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HackerRankResult {
    pub badges: u32,
    pub points: u32,
}

impl From<HackerRankResult> for HackerRankStats {
    fn from(result: HackerRankResult) -> Self {
        HackerRankStats {
            badges: result.badges,
        }
    }
}

/// Stat provider client.
#[derive(Clone)]
pub struct StatsClient {
    http: reqwest::Client,
    leetcode_url: String,
    codeforces_url: String,
    hackerrank_url: String,
}

impl StatsClient {
    /// Create a client; the configured timeout applies to every request.
    pub fn new(config: &ProviderConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("queryport/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            leetcode_url: config.leetcode_url.clone(),
            codeforces_url: config.codeforces_url.clone(),
            hackerrank_url: config.hackerrank_url.clone(),
        })
    }

    // ─── Public, infallible fetchers ─────────────────────────────

    /// Number of accepted problems across all difficulties.
    pub async fn fetch_leetcode_stats(&self, username: &str) -> LeetCodeStats {
        or_zero("leetcode", username, self.leetcode_solved(username).await)
    }

    /// Current and maximum contest rating.
    pub async fn fetch_codeforces_stats(&self, handle: &str) -> CodeforcesStats {
        or_zero("codeforces", handle, self.codeforces_rating(handle).await)
    }

    /// Number of badges with at least one star.
    pub async fn fetch_hackerrank_stats(&self, username: &str) -> HackerRankResult {
        or_zero("hackerrank", username, self.hackerrank_badges(username).await)
    }

    // ─── Provider calls ──────────────────────────────────────────

    async fn leetcode_solved(&self, username: &str) -> Result<LeetCodeStats, AppError> {
        let url = format!("{}/graphql", self.leetcode_url);

        let body = serde_json::json!({
            "query": LEETCODE_SOLVED_QUERY,
            "variables": { "username": username },
        });

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::REFERER, format!("{}/", self.leetcode_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let payload: LeetCodeResponse = check_response_json(response).await?;

        let matched_user = payload
            .data
            .and_then(|d| d.matched_user)
            .ok_or_else(|| AppError::Provider("LeetCode user not found".to_string()))?;

        let solved = matched_user
            .submit_stats_global
            .ac_submission_num
            .iter()
            .find(|entry| entry.difficulty == "All")
            .map(|entry| entry.count)
            .unwrap_or(0);

        Ok(LeetCodeStats { solved })
    }

    async fn codeforces_rating(&self, handle: &str) -> Result<CodeforcesStats, AppError> {
        let url = format!("{}/api/user.info", self.codeforces_url);

        let response = self
            .http
            .get(&url)
            .query(&[("handles", handle)])
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let payload: CodeforcesResponse = check_response_json(response).await?;

        if payload.status != "OK" {
            return Err(AppError::Provider(format!(
                "Codeforces status {}: {}",
                payload.status,
                payload.comment.unwrap_or_default()
            )));
        }

        let user = payload
            .result
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Provider("Codeforces returned no users".to_string()))?;

        Ok(CodeforcesStats {
            rating: user.rating,
            max_rating: user.max_rating,
        })
    }

    async fn hackerrank_badges(&self, username: &str) -> Result<HackerRankResult, AppError> {
        let url = format!(
            "{}/rest/hackers/{}/badges",
            self.hackerrank_url,
            urlencoding::encode(username)
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Provider(e.to_string()))?;

        let payload: HackerRankResponse = check_response_json(response).await?;

        let badges = payload.models.iter().filter(|b| b.stars > 0).count() as u32;

        Ok(HackerRankResult { badges, points: 0 })
    }
}

/// Log a provider failure and fall back to the zero record.
fn or_zero<T: Default>(provider: &'static str, handle: &str, result: Result<T, AppError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(provider, handle, error = %e, "Stats fetch failed, using zero");
        T::default()
    })
}

/// Check response status and parse the JSON body.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    if !status.is_success() {
        if status.as_u16() == 429 {
            tracing::warn!(url = %response.url(), "Stats provider rate limit hit (429)");
        }
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Provider(format!("HTTP {}: {}", status, body)));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::Provider(format!("JSON parse error: {}", e)))
}

// ─── Provider payloads ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct LeetCodeResponse {
    data: Option<LeetCodeData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeetCodeData {
    matched_user: Option<LeetCodeUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeetCodeUser {
    submit_stats_global: LeetCodeSubmitStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeetCodeSubmitStats {
    ac_submission_num: Vec<LeetCodeSubmissionCount>,
}

#[derive(Debug, Deserialize)]
struct LeetCodeSubmissionCount {
    difficulty: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct CodeforcesResponse {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Vec<CodeforcesUser>,
}

/// Unrated users have no rating fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeforcesUser {
    #[serde(default)]
    rating: i32,
    #[serde(default)]
    max_rating: i32,
}

#[derive(Debug, Deserialize)]
struct HackerRankResponse {
    #[serde(default)]
    models: Vec<HackerRankBadge>,
}

#[derive(Debug, Deserialize)]
struct HackerRankBadge {
    #[serde(default)]
    stars: u32,
}
