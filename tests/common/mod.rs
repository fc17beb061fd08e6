// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use queryport::config::{Config, ProviderConfig};
use queryport::db::{FirestoreDb, MemoryDb, Store};
use queryport::middleware::auth::create_jwt;
use queryport::models::{Profile, User};
use queryport::routes::create_router;
use queryport::services::StatsClient;
use queryport::AppState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Provider timeout used by tests; the mock "slow" handle sleeps past it.
#[allow(dead_code)]
pub const TEST_PROVIDER_TIMEOUT: Duration = Duration::from_millis(500);

/// Base URL with nothing listening on it.
#[allow(dead_code)]
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create an offline database; every operation fails.
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app whose store is an offline Firestore client.
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let stats_client = StatsClient::new(&config.providers).expect("stats client");

    let state = Arc::new(AppState {
        config,
        store: Arc::new(test_db_offline()),
        stats_client,
    });

    (create_router(state.clone()), state)
}

/// Provider config pointing every platform at `base_url`.
#[allow(dead_code)]
pub fn providers_at(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        leetcode_url: base_url.to_string(),
        codeforces_url: base_url.to_string(),
        hackerrank_url: base_url.to_string(),
        timeout: TEST_PROVIDER_TIMEOUT,
    }
}

/// Create a test app over an in-memory store with unreachable providers.
/// Returns the router, the shared state and a handle on the store for seeding.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryDb) {
    create_test_app_with_providers(providers_at(UNREACHABLE_URL))
}

#[allow(dead_code)]
pub fn create_test_app_with_providers(
    providers: ProviderConfig,
) -> (axum::Router, Arc<AppState>, MemoryDb) {
    let mut config = Config::test_default();
    config.providers = providers;

    let db = MemoryDb::new();
    let stats_client = StatsClient::new(&config.providers).expect("stats client");

    let state = Arc::new(AppState {
        config,
        store: Arc::new(db.clone()),
        stats_client,
    });

    (create_router(state.clone()), state, db)
}

/// Create a session token for `user_id`.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: &str, signing_key: &[u8]) -> String {
    create_jwt(user_id, signing_key).expect("Failed to create JWT")
}

#[allow(dead_code)]
pub fn test_user(id: &str, name: &str, username: &str) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        avatar: Some(format!("https://cdn.example.com/{username}.png")),
        created_at: "2026-01-01T00:00:00Z".to_string(),
    }
}

/// Store a user together with an empty profile.
#[allow(dead_code)]
pub async fn seed_user_with_profile(db: &MemoryDb, id: &str, name: &str, username: &str) {
    db.upsert_user(&test_user(id, name, username)).await.unwrap();
    db.upsert_profile(&Profile::new(id)).await.unwrap();
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("JSON body")
}

// ─── Mock stat providers ─────────────────────────────────────────

/// Serve fake LeetCode, Codeforces and HackerRank APIs on a local port.
///
/// Known handles: `alice_lc` (412 solved), `tourist` (3500/3800 rating),
/// `alice_hr` (2 starred badges). `broken` returns malformed payloads and
/// `slow` outlives [`TEST_PROVIDER_TIMEOUT`]. Anything else is "not found".
#[allow(dead_code)]
pub async fn spawn_mock_providers() -> String {
    let app = Router::new()
        .route("/graphql", post(mock_leetcode))
        .route("/api/user.info", get(mock_codeforces))
        .route("/rest/hackers/{username}/badges", get(mock_hackerrank));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock providers");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock provider server");
    });

    format!("http://{}", addr)
}

#[allow(dead_code)]
async fn mock_leetcode(Json(body): Json<serde_json::Value>) -> Response {
    let username = body["variables"]["username"].as_str().unwrap_or_default();
    match username {
        "alice_lc" => Json(serde_json::json!({
            "data": {"matchedUser": {"submitStatsGlobal": {"acSubmissionNum": [
                {"difficulty": "All", "count": 412, "submissions": 1000},
                {"difficulty": "Easy", "count": 200, "submissions": 300},
                {"difficulty": "Medium", "count": 180, "submissions": 500},
                {"difficulty": "Hard", "count": 32, "submissions": 200}
            ]}}}
        }))
        .into_response(),
        "broken" => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        "slow" => {
            tokio::time::sleep(TEST_PROVIDER_TIMEOUT * 4).await;
            Json(serde_json::json!({})).into_response()
        }
        _ => Json(serde_json::json!({
            "errors": [{"message": "That user does not exist."}],
            "data": {"matchedUser": null}
        }))
        .into_response(),
    }
}

#[allow(dead_code)]
async fn mock_codeforces(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("handles").map(String::as_str) {
        Some("tourist") => Json(serde_json::json!({
            "status": "OK",
            "result": [{"handle": "tourist", "rating": 3500, "maxRating": 3800}]
        }))
        .into_response(),
        Some("broken") => Json(serde_json::json!({"status": "OK", "result": "oops"})).into_response(),
        Some("slow") => {
            tokio::time::sleep(TEST_PROVIDER_TIMEOUT * 4).await;
            Json(serde_json::json!({"status": "OK", "result": []})).into_response()
        }
        _ => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "status": "FAILED",
                "comment": "handles: User not found"
            })),
        )
            .into_response(),
    }
}

#[allow(dead_code)]
async fn mock_hackerrank(Path(username): Path<String>) -> Response {
    match username.as_str() {
        "alice_hr" => Json(serde_json::json!({
            "models": [
                {"badge_name": "Problem Solving", "stars": 5},
                {"badge_name": "Java", "stars": 0},
                {"badge_name": "SQL", "stars": 2}
            ]
        }))
        .into_response(),
        "broken" => Json(serde_json::json!({"models": [{"stars": "many"}]})).into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
