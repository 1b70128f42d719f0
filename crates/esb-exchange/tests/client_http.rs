use esb_exchange::{Client, ExchangeApi, ExchangePoolStatus, SportEventStatus};
use httpmock::prelude::*;

#[tokio::test]
async fn requests_are_signed_and_wrapped() {
    let server = MockServer::start_async().await;
    let visible = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/pools/p1/visible")
                .header_exists("Authorization")
                .header_exists("Content-MD5")
                .header_exists("Date")
                .header("Content-Type", "application/json")
                .json_body_partial(r#"{ "pool": { "visible": true } }"#);
            then.status(200).json_body(serde_json::json!({"message": "ok"}));
        })
        .await;

    let client = Client::new("key", "secret", server.base_url());
    let resp = client.toggle_pool_visibility("p1", true).await.unwrap();
    assert_eq!(resp.message.as_deref(), Some("ok"));
    visible.assert_async().await;
}

#[tokio::test]
async fn pool_lookup_404_is_reported_as_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pools/p1");
            then.status(404).body("no such pool");
        })
        .await;

    let client = Client::new("key", "secret", server.base_url());
    let err = client.pool_status("p1").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn server_errors_carry_status_and_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/pools/p1/settle");
            then.status(500).body("boom");
        })
        .await;

    let client = Client::new("key", "secret", server.base_url());
    let err = client.settle_pool("p1").await.unwrap_err();
    assert!(!err.is_not_found());
    let text = err.to_string();
    assert!(text.contains("500"));
    assert!(text.contains("boom"));
}

#[tokio::test]
async fn pool_status_deserializes_settlement_fields() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/pools/p2");
            then.status(200).json_body(serde_json::json!({
                "status": "OPEN",
                "settlement_status": "settled",
                "settled_at": "2026-03-01T10:00:00Z"
            }));
        })
        .await;

    let client = Client::new("key", "secret", server.base_url());
    let resp = client.pool_status("p2").await.unwrap();
    assert_eq!(resp.status, Some(ExchangePoolStatus::Open));
    assert!(resp.settled_at.is_some());
}

#[tokio::test]
async fn progress_sends_old_and_new_status() {
    let server = MockServer::start_async().await;
    let progress = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/sport_events/m1-H2H/progress")
                .json_body_partial(r#"{ "old_status": "IN_PLAY", "new_status": "COMPLETED" }"#);
            then.status(200).json_body(serde_json::json!({}));
        })
        .await;

    let client = Client::new("key", "secret", server.base_url());
    client
        .progress_sport_event("m1-H2H", SportEventStatus::InPlay, SportEventStatus::Completed)
        .await
        .unwrap();
    progress.assert_async().await;
}
