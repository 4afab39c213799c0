mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

use common::{expect_status, spawn_server, PASSWORD};

#[tokio::test]
async fn follow_and_unfollow_are_idempotent() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;
    let theo = server.register("theo").await?;

    let follow = format!("/users/{}/follow", maya.id);
    for _ in 0..2 {
        expect_status(server.post(&follow).bearer_auth(&theo.token).send().await?, StatusCode::OK).await?;
    }

    let followers = expect_status(server.get(&format!("/users/{}/followers", maya.id)).send().await?, StatusCode::OK).await?;
    assert_eq!(followers.as_array().map(Vec::len), Some(1));
    assert_eq!(followers[0]["username"], "theo");

    let following = expect_status(server.get(&format!("/users/{}/following", theo.id)).send().await?, StatusCode::OK).await?;
    assert_eq!(following[0]["username"], "maya");

    let notes = expect_status(server.get("/notifications/unread").bearer_auth(&maya.token).send().await?, StatusCode::OK).await?;
    assert_eq!(notes[0]["kind"], "follow");

    let unfollow = format!("/users/{}/unfollow", maya.id);
    for _ in 0..2 {
        expect_status(server.post(&unfollow).bearer_auth(&theo.token).send().await?, StatusCode::OK).await?;
    }
    assert_eq!(server.count(&format!("/users/{}/followers", maya.id)).await?, 0);

    Ok(())
}

#[tokio::test]
async fn cannot_follow_yourself() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;

    let res = server.post(&format!("/users/{}/follow", maya.id)).bearer_auth(&maya.token).send().await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["message"], "You cannot follow yourself");

    Ok(())
}

#[tokio::test]
async fn profile_updates_are_self_only() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;
    let theo = server.register("theo").await?;

    let path = format!("/users/{}", maya.id);
    let res = server.put(&path).bearer_auth(&theo.token).json(&json!({ "bio": "hijacked" })).send().await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;

    let res = server.put(&path).bearer_auth(&maya.token).json(&json!({ "bio": "Potter" })).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["bio"], "Potter");

    let fetched = expect_status(server.get(&path).send().await?, StatusCode::OK).await?;
    assert_eq!(fetched["bio"], "Potter");
    assert!(fetched.get("passwordHash").is_none());

    Ok(())
}

#[tokio::test]
async fn public_create_and_suggestions() -> Result<()> {
    let server = spawn_server().await?;

    let res = server
        .post("/users")
        .json(&json!({ "username": "ines", "email": "ines@example.com", "password": PASSWORD }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::CREATED).await?;
    assert_eq!(body["username"], "ines");
    assert!(body.get("token").is_none());
    assert!(body.get("passwordHash").is_none());

    for i in 0..11 {
        server.register(&format!("maker{}", i)).await?;
    }
    assert_eq!(server.count("/users").await?, 12);
    assert_eq!(server.count("/users/suggestions").await?, 10);

    Ok(())
}
