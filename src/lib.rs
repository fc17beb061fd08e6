// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! QueryPort: developer portfolios and a coding-platform leaderboard
//!
//! This crate provides the backend API that aggregates LeetCode, Codeforces
//! and HackerRank statistics onto user profiles and ranks them.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Store;
use services::StatsClient;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn Store>,
    pub stats_client: StatsClient,
}
