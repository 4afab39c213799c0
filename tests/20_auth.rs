mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{expect_status, spawn_server, PASSWORD};
use drycraft_api::auth::validate_jwt;

#[tokio::test]
async fn register_returns_token_and_public_user() -> Result<()> {
    let server = spawn_server().await?;

    let res = server
        .post("/auth/register")
        .json(&json!({
            "username": "maya",
            "email": "Maya@Example.com",
            "password": PASSWORD,
            "firstName": "Maya",
            "lastName": "Lin"
        }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::CREATED).await?;

    assert!(body["token"].is_string());
    assert_eq!(body["user"]["username"], "maya");
    assert_eq!(body["user"]["email"], "maya@example.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password").is_none());

    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_new_user() -> Result<()> {
    let server = spawn_server().await?;
    server.register("maya").await?;
    assert_eq!(server.count("/users").await?, 1);

    let res = server
        .post("/auth/register")
        .json(&json!({ "username": "maya", "email": "other@example.com", "password": PASSWORD }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["message"], "Username or email already exists");

    let res = server
        .post("/auth/register")
        .json(&json!({ "username": "other", "email": "maya@example.com", "password": PASSWORD }))
        .send()
        .await?;
    expect_status(res, StatusCode::BAD_REQUEST).await?;

    assert_eq!(server.count("/users").await?, 1);
    Ok(())
}

#[tokio::test]
async fn register_validates_input() -> Result<()> {
    let server = spawn_server().await?;

    let cases = [
        (json!({ "username": "maya", "password": PASSWORD }), "Username, email, and password are required"),
        (json!({ "username": "maya", "email": "not-an-email", "password": PASSWORD }), "Invalid email address"),
        (json!({ "username": "maya", "email": "maya@example.com", "password": "123" }), "Password must be at least 6 characters"),
    ];

    for (payload, message) in cases {
        let res = server.post("/auth/register").json(&payload).send().await?;
        let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
        assert_eq!(body["message"], message, "payload: {}", payload);
    }

    assert_eq!(server.count("/users").await?, 0);
    Ok(())
}

#[tokio::test]
async fn login_token_carries_user_id() -> Result<()> {
    let server = spawn_server().await?;
    let user = server.register("maya").await?;

    let res = server
        .post("/auth/login")
        .json(&json!({ "username": "maya", "password": PASSWORD }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::OK).await?;

    let token = body["token"].as_str().unwrap_or_default();
    let claims = validate_jwt("test-secret", token)?;
    assert_eq!(claims.user_id.to_string(), user.id);
    assert_eq!(claims.username, "maya");
    assert!(body["user"].get("passwordHash").is_none());

    Ok(())
}

#[tokio::test]
async fn login_failures() -> Result<()> {
    let server = spawn_server().await?;
    server.register("maya").await?;

    let res = server
        .post("/auth/login")
        .json(&json!({ "username": "maya", "password": "wrong-password" }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::UNAUTHORIZED).await?;
    assert_eq!(body["message"], "Invalid credentials");

    let res = server
        .post("/auth/login")
        .json(&json!({ "username": "nobody", "password": PASSWORD }))
        .send()
        .await?;
    expect_status(res, StatusCode::UNAUTHORIZED).await?;

    let res = server.post("/auth/login").json(&json!({ "username": "maya" })).send().await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["message"], "Username and password are required");

    Ok(())
}

#[tokio::test]
async fn malformed_json_is_bad_request() -> Result<()> {
    let server = spawn_server().await?;

    let res = server
        .post("/auth/login")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["code"], "INVALID_JSON");

    Ok(())
}

#[tokio::test]
async fn protected_route_rejects_missing_or_bad_token() -> Result<()> {
    let server = spawn_server().await?;

    let res = server.post("/posts").json(&json!({ "content": "hi" })).send().await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;

    let res = server
        .post("/posts")
        .bearer_auth("not-a-token")
        .json(&json!({ "content": "hi" }))
        .send()
        .await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;

    assert_eq!(server.count("/posts").await?, 0);
    Ok(())
}
