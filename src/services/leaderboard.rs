// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard query engine.
//!
//! Turns free-text query parameters into a typed compound sort, applies the
//! search and type filters, and returns one page of profiles expanded with
//! their users.

use crate::db::Store;
use crate::error::Result;
use crate::models::{Profile, ProfileView, Stats};
use serde::Deserialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;
const DEFAULT_SORT: &str = "likes";
/// `type` value meaning "no filter".
const ALL_TYPES: &str = "All";

/// A sortable stats field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Likes,
    Leetcode,
    Codeforces,
    Hackerrank,
    Cgpa,
}

impl SortKey {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "likes" => Some(SortKey::Likes),
            "leetcode" => Some(SortKey::Leetcode),
            "codeforces" => Some(SortKey::Codeforces),
            "hackerrank" => Some(SortKey::Hackerrank),
            "cgpa" => Some(SortKey::Cgpa),
            _ => None,
        }
    }

    /// Stored document path of the field.
    pub fn field_path(&self) -> &'static str {
        match self {
            SortKey::Likes => "stats.totalLikes",
            SortKey::Leetcode => "stats.leetcode.solved",
            SortKey::Codeforces => "stats.codeforces.rating",
            SortKey::Hackerrank => "stats.hackerrank.badges",
            SortKey::Cgpa => "stats.cgpa",
        }
    }

    fn value(&self, stats: &Stats) -> f64 {
        match self {
            SortKey::Likes => stats.total_likes as f64,
            SortKey::Leetcode => f64::from(stats.leetcode.solved),
            SortKey::Codeforces => f64::from(stats.codeforces.rating),
            SortKey::Hackerrank => f64::from(stats.hackerrank.badges),
            SortKey::Cgpa => stats.cgpa,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `asc` is ascending; anything else, including nothing, is descending.
    pub fn parse(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }
}

/// Ordered (key, direction) pairs; the first is primary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec(Vec<(SortKey, SortOrder)>);

impl SortSpec {
    /// Resolve `sortBy` and `order` into a sort.
    ///
    /// `sortBy` containing `:` or `,` is a list of `key:order` pairs. Otherwise
    /// it names one key sorted by `order`, or `overall` for the fixed
    /// LeetCode/HackerRank/CGPA ranking.
    pub fn resolve(sort_by: &str, order: Option<&str>) -> Self {
        if sort_by.contains(':') || sort_by.contains(',') {
            let mut spec = SortSpec(Vec::new());
            for pair in sort_by.split(',') {
                let mut parts = pair.splitn(2, ':');
                let key = parts
                    .next()
                    .and_then(|k| SortKey::parse(k.trim()))
                    .unwrap_or(SortKey::Likes);
                spec.push(key, SortOrder::parse(parts.next()));
            }
            return spec;
        }

        match sort_by.trim() {
            "overall" => SortSpec::overall(),
            other => {
                let key = SortKey::parse(other).unwrap_or(SortKey::Likes);
                SortSpec(vec![(key, SortOrder::parse(order))])
            }
        }
    }

    /// Fixed ranking used by `sortBy=overall`.
    pub fn overall() -> Self {
        SortSpec(vec![
            (SortKey::Leetcode, SortOrder::Desc),
            (SortKey::Hackerrank, SortOrder::Desc),
            (SortKey::Cgpa, SortOrder::Desc),
        ])
    }

    pub fn keys(&self) -> &[(SortKey, SortOrder)] {
        &self.0
    }

    /// A repeated key keeps its first position and takes the newest direction.
    fn push(&mut self, key: SortKey, order: SortOrder) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(existing) => existing.1 = order,
            None => self.0.push((key, order)),
        }
    }

    pub fn compare(&self, a: &Stats, b: &Stats) -> Ordering {
        self.0
            .iter()
            .map(|(key, order)| {
                let ord = key.value(a).total_cmp(&key.value(b));
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

/// Raw query string of `GET /leaderboard`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    #[serde(rename = "type")]
    pub profile_type: Option<String>,
    pub search: Option<String>,
}

/// Validated leaderboard parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardParams {
    pub page: u32,
    pub limit: u32,
    pub sort: SortSpec,
    pub profile_type: Option<String>,
    /// Lowercased search needle
    pub search: Option<String>,
}

impl From<&LeaderboardQuery> for LeaderboardParams {
    /// Malformed or out-of-range numbers fall back to defaults.
    fn from(query: &LeaderboardQuery) -> Self {
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);

        let sort = SortSpec::resolve(
            query.sort_by.as_deref().unwrap_or(DEFAULT_SORT),
            query.order.as_deref(),
        );

        let profile_type = query
            .profile_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && *t != ALL_TYPES)
            .map(String::from);

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Self {
            page,
            limit,
            sort,
            profile_type,
            search,
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
}

/// One page of leaderboard results.
#[derive(Debug, Clone)]
pub struct LeaderboardPage {
    pub entries: Vec<ProfileView>,
    /// Matching profiles across all pages
    pub total: usize,
    pub total_pages: usize,
    pub page: u32,
}

impl LeaderboardPage {
    fn empty(page: u32) -> Self {
        Self {
            entries: Vec::new(),
            total: 0,
            total_pages: 0,
            page,
        }
    }
}

/// Run a leaderboard query.
pub async fn get_leaderboard(
    store: &dyn Store,
    params: &LeaderboardParams,
) -> Result<LeaderboardPage> {
    tracing::debug!(
        page = params.page,
        limit = params.limit,
        sort = ?params.sort,
        profile_type = ?params.profile_type,
        search = ?params.search,
        "Fetching leaderboard"
    );

    // Resolve search to a set of user IDs first. Both this and the profile
    // listing below read whole collections; the sort runs in process.
    let allowed_users: Option<HashSet<String>> = match &params.search {
        Some(needle) => {
            let ids: HashSet<String> = store
                .list_users()
                .await?
                .into_iter()
                .filter(|u| u.matches_search(needle))
                .map(|u| u.id)
                .collect();

            if ids.is_empty() {
                return Ok(LeaderboardPage::empty(params.page));
            }
            Some(ids)
        }
        None => None,
    };

    let mut profiles: Vec<Profile> = store
        .list_profiles(params.profile_type.as_deref())
        .await?
        .into_iter()
        .filter(|p| {
            allowed_users
                .as_ref()
                .map_or(true, |ids| ids.contains(&p.user))
        })
        .collect();

    // Stable: profiles equal on every key keep their storage order
    profiles.sort_by(|a, b| params.sort.compare(&a.stats, &b.stats));

    let total = profiles.len();
    let limit = params.limit as usize;
    let total_pages = total.div_ceil(limit);
    let skip = (params.page as usize - 1).saturating_mul(limit);

    let page: Vec<Profile> = profiles.into_iter().skip(skip).take(limit).collect();

    let user_ids: Vec<String> = page.iter().map(|p| p.user.clone()).collect();
    let users: HashMap<String, _> = store
        .get_users(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id.clone(), u))
        .collect();

    let entries = page
        .into_iter()
        .map(|p| {
            let user = users.get(&p.user);
            ProfileView::new(p, user)
        })
        .collect();

    Ok(LeaderboardPage {
        entries,
        total,
        total_pages,
        page: params.page,
    })
}
