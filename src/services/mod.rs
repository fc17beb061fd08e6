// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod leaderboard;
pub mod providers;
pub mod sync;

pub use leaderboard::{get_leaderboard, LeaderboardPage, LeaderboardParams, SortSpec};
pub use providers::StatsClient;
pub use sync::{sync_stats, SyncOutcome};
