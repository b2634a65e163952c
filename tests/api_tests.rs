use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use flicklet_daily::api::{create_router, AppState};
use flicklet_daily::config::Config;
use flicklet_daily::db::MemoryBlobStore;

async fn create_test_server_with(config: Config) -> TestServer {
    let state = AppState::build(&config, Arc::new(MemoryBlobStore::new()))
        .await
        .unwrap();
    let app = create_router(state, config.enable_debug_routes);
    TestServer::new(app).unwrap()
}

async fn create_test_server() -> TestServer {
    create_test_server_with(Config {
        record_word_on_resolve: false,
        enable_debug_routes: true,
        ..Config::default()
    })
    .await
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server().await;
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server().await;
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("client-7"),
        )
        .await;
    assert_eq!(response.header("x-request-id").to_str().unwrap(), "client-7");
}

#[tokio::test]
async fn test_daily_word_is_deterministic() {
    let server = create_test_server().await;

    let first: Value = server
        .get("/api/v1/flickword/daily")
        .add_query_param("date", "2024-06-01")
        .await
        .json();
    let second: Value = server
        .get("/api/v1/flickword/daily")
        .add_query_param("date", "2024-06-01T22:15:00Z")
        .await
        .json();

    assert_eq!(first, second);
    assert_eq!(first["date"], "2024-06-01");
    assert_eq!(first["slot"], 1);
    assert_eq!(first["word"].as_str().unwrap().len(), 5);
}

#[tokio::test]
async fn test_invalid_date_is_bad_request() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/flickword/daily")
        .add_query_param("date", "2024-02-30")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("2024-02-30"));
}

#[tokio::test]
async fn test_preview_matches_daily_lookups() {
    let server = create_test_server_with(Config {
        record_word_on_resolve: true,
        ..Config::default()
    })
    .await;

    let preview: Vec<Value> = server
        .get("/api/v1/flickword/preview")
        .add_query_param("start", "2024-06-01")
        .add_query_param("days", 6)
        .await
        .json();
    assert_eq!(preview.len(), 6);

    for (offset, expected) in preview.iter().enumerate() {
        let date = format!("2024-06-{:02}", offset + 1);
        let daily: Value = server
            .get("/api/v1/flickword/daily")
            .add_query_param("date", &date)
            .await
            .json();
        assert_eq!(daily["word"], expected["word"], "{}", date);
    }

    for pair in preview.windows(2) {
        let a = pair[0]["word"].as_str().unwrap();
        let b = pair[1]["word"].as_str().unwrap();
        assert_ne!(a.chars().next(), b.chars().next());
    }
}

#[tokio::test]
async fn test_preview_rejects_too_many_days() {
    let server = create_test_server().await;
    server
        .get("/api/v1/flickword/preview")
        .add_query_param("days", 365)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_record_word_is_idempotent() {
    let server = create_test_server().await;
    let word: Value = server
        .get("/api/v1/flickword/daily")
        .add_query_param("date", "2024-06-01")
        .await
        .json();

    let body = json!({ "date": "2024-06-01", "items": [word["word"]] });
    let first: Value = server.post("/api/v1/flickword/played").json(&body).await.json();
    let second: Value = server.post("/api/v1/flickword/played").json(&body).await.json();
    assert_eq!(first["recorded"], true);
    assert_eq!(second["recorded"], false);

    let stats: Value = server.get("/api/v1/flickword/stats").await.json();
    assert_eq!(stats["history"]["total_records"], 1);
    assert_eq!(stats["history"]["total_items"], 1);
    assert_eq!(stats["backend"], "memory");
}

#[tokio::test]
async fn test_record_unknown_word_is_bad_request() {
    let server = create_test_server().await;
    server
        .post("/api/v1/flickword/played")
        .json(&json!({ "date": "2024-06-01", "items": ["qqqqq"] }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trivia_game_returns_distinct_questions() {
    let server = create_test_server().await;
    let response = server
        .get("/api/v1/trivia/daily")
        .add_query_param("date", "2024-06-01")
        .add_query_param("game", 2)
        .await;
    response.assert_status_ok();

    let game: Value = response.json();
    assert_eq!(game["game"], 2);
    let questions = game["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 5);

    let mut ids: Vec<&str> = questions.iter().map(|q| q["id"].as_str().unwrap()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[tokio::test]
async fn test_played_trivia_is_not_repeated() {
    let server = create_test_server().await;

    let first: Value = server
        .get("/api/v1/trivia/daily")
        .add_query_param("date", "2024-06-01")
        .await
        .json();
    let ids: Vec<Value> = first["questions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].clone())
        .collect();

    server
        .post("/api/v1/trivia/played")
        .json(&json!({ "date": "2024-06-01", "game": 1, "items": &ids }))
        .await
        .assert_status_ok();

    let second: Value = server
        .get("/api/v1/trivia/daily")
        .add_query_param("date", "2024-06-01")
        .add_query_param("game", 2)
        .await
        .json();
    for question in second["questions"].as_array().unwrap() {
        assert!(!ids.contains(&question["id"]));
    }

    let stats: Value = server.get("/api/v1/trivia/stats").await.json();
    assert_eq!(stats["history"]["total_items"], 5);
}

#[tokio::test]
async fn test_clear_history_when_debug_enabled() {
    let server = create_test_server().await;
    server
        .post("/api/v1/flickword/played")
        .json(&json!({ "date": "2024-06-01", "items": ["crane"] }))
        .await
        .assert_status_ok();

    server
        .delete("/api/v1/flickword/history")
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let stats: Value = server.get("/api/v1/flickword/stats").await.json();
    assert_eq!(stats["history"]["total_records"], 0);
}

#[tokio::test]
async fn test_debug_routes_absent_by_default() {
    let server = create_test_server_with(Config::default()).await;
    server
        .delete("/api/v1/trivia/history")
        .await
        .assert_status_not_found();
    server
        .delete("/api/v1/flickword/history")
        .await
        .assert_status_not_found();
}
