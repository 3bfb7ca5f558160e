mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn sending_records_sender_from_token() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, body) = server
        .post_as(
            "alice",
            "/messages",
            Some(json!({ "to_username": "bob", "body": "hi", "from_username": "carol" })),
        )
        .await?;
    assert_eq!(status, StatusCode::OK);

    let message = &body["message"];
    assert!(message["id"].is_i64());
    assert_eq!(message["from_username"], "alice");
    assert_eq!(message["to_username"], "bob");
    assert_eq!(message["body"], "hi");
    assert!(message["sent_at"].is_string());
    assert!(message.get("read_at").map_or(true, |v| v.is_null()));
    Ok(())
}

#[tokio::test]
async fn recipient_sees_full_message() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = server.send("alice", "bob", "hi").await?;

    let (status, body) = server.get_as("bob", &format!("/messages/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);

    let message = &body["message"];
    assert_eq!(message["id"], id);
    assert_eq!(message["body"], "hi");
    assert!(message["read_at"].is_null());
    assert_eq!(message["from_user"]["username"], "alice");
    assert_eq!(message["from_user"]["first_name"], "Alice");
    assert_eq!(message["to_user"]["username"], "bob");
    assert_eq!(message["to_user"]["phone"], "+15550001111");
    Ok(())
}

#[tokio::test]
async fn sender_can_view_own_message() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = server.send("alice", "bob", "hi").await?;

    let (status, _) = server.get_as("alice", &format!("/messages/{}", id)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn third_party_cannot_view() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = server.send("alice", "bob", "a secret").await?;

    let (status, body) = server.get_as("carol", &format!("/messages/{}", id)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert!(!body.to_string().contains("a secret"));
    Ok(())
}

#[tokio::test]
async fn only_recipient_marks_read() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = server.send("alice", "bob", "hi").await?;
    let path = format!("/messages/{}/read", id);

    let (status, _) = server.post_as("alice", &path, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = server.post_as("carol", &path, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Denied attempts must not have touched the message
    let (_, body) = server.get_as("bob", &format!("/messages/{}", id)).await?;
    assert!(body["message"]["read_at"].is_null());

    let (status, body) = server.post_as("bob", &path, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["id"], id);
    assert!(body["message"]["read_at"].is_string());
    Ok(())
}

#[tokio::test]
async fn marking_read_twice_is_stable() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let id = server.send("alice", "bob", "hi").await?;
    let path = format!("/messages/{}/read", id);

    let (_, first) = server.post_as("bob", &path, None).await?;
    let (status, second) = server.post_as("bob", &path, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["message"]["read_at"], second["message"]["read_at"]);

    let (_, detail) = server.get_as("alice", &format!("/messages/{}", id)).await?;
    assert_eq!(detail["message"]["read_at"], first["message"]["read_at"]);
    Ok(())
}

#[tokio::test]
async fn unknown_message_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, body) = server.get_as("bob", "/messages/4242").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, _) = server.post_as("bob", "/messages/4242/read", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn non_integer_id_is_bad_request() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, body) = server.get_as("bob", "/messages/abc").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn unknown_recipient_is_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, body) = server
        .post_as("alice", "/messages", Some(json!({ "to_username": "zed", "body": "hi" })))
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap_or_default().contains("zed"));
    Ok(())
}

#[tokio::test]
async fn malformed_payloads_are_bad_requests() -> Result<()> {
    let server = common::TestServer::spawn().await?;

    let (status, body) = server
        .post_as("alice", "/messages", Some(json!({ "to_username": "bob" })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");

    let (status, body) = server
        .post_as("alice", "/messages", Some(json!({ "to_username": "bob", "body": "   " })))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["body"].is_string());

    let res = server
        .client
        .post(server.url("/messages"))
        .bearer_auth(server.token("alice"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn oversized_payload_is_too_large_not_malformed() -> Result<()> {
    let server = common::TestServer::spawn_with(|config| config.api.max_request_size_bytes = 64).await?;

    let (status, body) = server
        .post_as("alice", "/messages", Some(json!({ "to_username": "bob", "body": "x".repeat(256) })))
        .await?;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert_eq!(body["status"], 413);

    // Small payloads still go through under the same limit
    let (status, _) = server
        .post_as("alice", "/messages", Some(json!({ "to_username": "bob", "body": "hi" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}
