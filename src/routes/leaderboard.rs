// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard listing and stats sync.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::ProfileView;
use crate::services::leaderboard::{get_leaderboard, LeaderboardParams, LeaderboardQuery};
use crate::services::{sync_stats, SyncOutcome};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

/// Anyone can read the leaderboard.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new().route("/leaderboard", get(list_leaderboard))
}

/// Syncing requires a session; the auth layer is applied in routes/mod.rs.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/leaderboard/sync", post(sync))
}

// ─── Sync ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SyncResponse {
    pub status: String,
    pub data: SyncOutcome,
}

/// Recompute the caller's stats from providers, projects and education.
async fn sync(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SyncResponse>> {
    let outcome = sync_stats(state.store.as_ref(), &state.stats_client, &user.user_id).await?;

    Ok(Json(SyncResponse {
        status: "success".to_string(),
        data: outcome,
    }))
}

// ─── Listing ─────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub status: String,
    /// Total matching profiles, not the size of this page
    pub results: usize,
    pub total_pages: usize,
    pub current_page: u32,
    pub data: Vec<ProfileView>,
}

/// Sorted, filtered, paginated leaderboard.
async fn list_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<LeaderboardResponse>> {
    let params = LeaderboardParams::from(&query);
    let page = get_leaderboard(state.store.as_ref(), &params).await?;

    Ok(Json(LeaderboardResponse {
        status: "success".to_string(),
        results: page.total,
        total_pages: page.total_pages,
        current_page: page.page,
        data: page.entries,
    }))
}
