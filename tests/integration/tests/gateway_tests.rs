//! Gateway integration tests
//!
//! Each test starts its own gateway on an ephemeral port with in-memory
//! storage; no external services are needed.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use futures_util::SinkExt;
use integration_tests::{
    assert_error, assert_json, fixed_policy, next_push, next_push_of, TestServer, TEST_CHAT,
};
use reactor_core::{ChatId, InboundMessage, MessageId, OutcomeStatus, PlatformError};
use reactor_service::{PipelineOutcome, RejectReason};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio_tungstenite::tungstenite::Message;

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["telegram"], false);
    assert!(body["timestamp"].is_string());
    assert!(body["uptime"].is_u64());

    server.shutdown().await.unwrap();
}

// ============================================================================
// WebSocket push
// ============================================================================

#[tokio::test]
async fn test_initial_stats_on_connect() {
    let server = TestServer::start().await.unwrap();
    let mut ws = server.connect_ws().await.unwrap();

    let first = next_push(&mut ws).await.unwrap();
    assert_eq!(first["type"], "initial_stats");
    assert_eq!(first["data"]["total_reactions"], 0);
    assert_eq!(first["data"]["emoji_usage"], json!({}));
    assert!(first["timestamp"].is_string());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_periodic_stats_update() {
    let server = TestServer::start().await.unwrap();
    let mut ws = server.connect_ws().await.unwrap();
    next_push_of(&mut ws, "initial_stats").await.unwrap();

    let update = next_push_of(&mut ws, "stats_update").await.unwrap();
    assert!(update["data"]["bot_uptime"].is_u64());
    assert!(update["data"]["hourly_stats"].is_array());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_client_messages_ignored() {
    let server = TestServer::start().await.unwrap();
    let mut ws = server.connect_ws().await.unwrap();
    next_push_of(&mut ws, "initial_stats").await.unwrap();

    ws.send(Message::Text("hello".to_string())).await.unwrap();

    // Still subscribed after the client spoke
    let update = next_push_of(&mut ws, "stats_update").await.unwrap();
    assert_eq!(update["type"], "stats_update");

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reaction_pushed_to_subscriber() {
    let server = TestServer::start().await.unwrap();
    server.policies.insert(fixed_policy(TEST_CHAT, "🔥"));

    let mut ws = server.connect_ws().await.unwrap();
    next_push_of(&mut ws, "initial_stats").await.unwrap();

    let outcome = server
        .pipeline()
        .handle(InboundMessage::text(TEST_CHAT, MessageId::new(42)))
        .await;
    let PipelineOutcome::Dispatched(report) = outcome else {
        panic!("expected dispatch, got {outcome:?}");
    };
    assert!(report.delivered());

    let pushed = next_push_of(&mut ws, "reaction").await.unwrap();
    assert_eq!(
        pushed["data"],
        json!({
            "chat_id": TEST_CHAT.into_inner(),
            "message_id": 42,
            "emoji": "🔥",
            "status": "success",
        })
    );

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_chat_events_relayed() {
    let server = TestServer::start().await.unwrap();
    let mut ws = server.connect_ws().await.unwrap();
    next_push_of(&mut ws, "initial_stats").await.unwrap();

    server.events().chat_added(ChatId::new(-5), "New Group");
    server
        .events()
        .error("outcome_persistence", "disk full", None);

    let added = next_push_of(&mut ws, "chat_added").await.unwrap();
    assert_eq!(added["data"], json!({"chat_id": -5, "chat_title": "New Group"}));

    let error = next_push_of(&mut ws, "error").await.unwrap();
    assert_eq!(error["data"]["error_type"], "outcome_persistence");
    assert_eq!(error["data"]["details"], json!({}));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_shutdown_closes_socket() {
    let server = TestServer::start().await.unwrap();
    let mut ws = server.connect_ws().await.unwrap();
    next_push_of(&mut ws, "initial_stats").await.unwrap();

    server.shutdown().await.unwrap();

    assert!(next_push(&mut ws).await.is_err());
}

// ============================================================================
// Pipeline against the stores
// ============================================================================

#[tokio::test]
async fn test_unknown_chat_records_nothing() {
    let server = TestServer::start().await.unwrap();

    let outcome = server
        .pipeline()
        .handle(InboundMessage::text(ChatId::new(-1), MessageId::new(1)))
        .await;

    assert!(matches!(
        outcome,
        PipelineOutcome::Rejected(RejectReason::UnknownChat)
    ));
    assert!(server.outcomes.is_empty());
    assert!(server.platform.sent().is_empty());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_flood_wait_then_success() {
    let server = TestServer::start().await.unwrap();
    server.policies.insert(fixed_policy(TEST_CHAT, "👍"));
    server.platform.push_reply(Err(PlatformError::FloodWait(0)));

    let outcome = server
        .pipeline()
        .handle(InboundMessage::text(TEST_CHAT, MessageId::new(7)))
        .await;
    assert!(matches!(outcome, PipelineOutcome::Dispatched(ref r) if r.delivered()));

    let statuses: Vec<_> = server.outcomes.records().iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![OutcomeStatus::FloodWait, OutcomeStatus::Success]);
    assert_eq!(server.platform.sent().len(), 2);

    let runtime: Value = assert_json(
        server.get("/api/v1/stats/runtime").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(runtime["total_reactions"], 1);
    assert_eq!(runtime["flood_waits"], 1);

    server.shutdown().await.unwrap();
}

// ============================================================================
// Stats API
// ============================================================================

#[tokio::test]
async fn test_stats_routes_after_reactions() {
    let server = TestServer::start().await.unwrap();
    server.policies.insert(fixed_policy(TEST_CHAT, "🔥"));

    for id in 1..=3 {
        server
            .pipeline()
            .handle(InboundMessage::text(TEST_CHAT, MessageId::new(id)))
            .await;
    }

    let snapshot: Value = assert_json(server.get("/api/v1/stats").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(snapshot["total_reactions"], 3);
    assert_eq!(snapshot["active_chats"], 1);
    assert_eq!(snapshot["emoji_usage"], json!({"🔥": 3}));
    assert_eq!(snapshot["error_rate"], 0.0);

    let path = format!("/api/v1/stats/chat/{}?days=1", TEST_CHAT);
    let chat: Value = assert_json(server.get(&path).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(chat["total_reactions"], 3);
    assert_eq!(chat["errors"], 0);

    let top: Value = assert_json(
        server.get("/api/v1/stats/top-chats?limit=5").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(
        top,
        json!([{"chat_id": TEST_CHAT.into_inner(), "chat_title": "Test Chat", "reactions": 3}])
    );

    let daily: Value = assert_json(server.get("/api/v1/stats/daily").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(daily["total_reactions"], 3);
    assert_eq!(daily["total_attempts"], 3);
    assert_eq!(daily["success_rate"], 100.0);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_daily_for_empty_date() {
    let server = TestServer::start().await.unwrap();

    let daily: Value = assert_json(
        server.get("/api/v1/stats/daily?date=2020-01-01").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(daily["date"], "2020-01-01");
    assert_eq!(daily["total_reactions"], 0);
    assert_eq!(daily["success_rate"], 0.0);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_stats_input_errors() {
    let server = TestServer::start().await.unwrap();

    let code = assert_error(
        server.get("/api/v1/stats/chat/not-a-number").await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    let code = assert_error(
        server.get("/api/v1/stats/chat/-1?days=0").await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    let code = assert_error(
        server.get("/api/v1/stats/top-chats?limit=many").await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");

    let code = assert_error(
        server.get("/api/v1/stats/daily?date=yesterday").await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "INVALID_QUERY_PARAMETER");

    server.shutdown().await.unwrap();
}
