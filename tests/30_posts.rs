mod common;

use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{expect_status, spawn_server, TestServer, TestUser};

async fn create_post(server: &TestServer, user: &TestUser, content: &str) -> Result<Value> {
    let res = server
        .post("/posts")
        .bearer_auth(&user.token)
        .json(&json!({ "content": content }))
        .send()
        .await?;
    expect_status(res, StatusCode::CREATED).await
}

#[tokio::test]
async fn posts_are_listed_newest_first() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;

    for content in ["first", "second", "third"] {
        create_post(&server, &maya, content).await?;
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let body = expect_status(server.get("/posts").send().await?, StatusCode::OK).await?;
    let contents: Vec<&str> = body
        .as_array()
        .map(|posts| posts.iter().filter_map(|p| p["content"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(contents, ["third", "second", "first"]);

    let mine = format!("/posts/user/{}", maya.id);
    assert_eq!(server.count(&mine).await?, 3);

    Ok(())
}

#[tokio::test]
async fn post_without_content_or_media_is_rejected() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;

    let res = server
        .post("/posts")
        .bearer_auth(&maya.token)
        .json(&json!({ "content": "   " }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["message"], "Post must have content, images, or a video");
    assert_eq!(server.count("/posts").await?, 0);

    // Media alone is enough
    let res = server
        .post("/posts")
        .bearer_auth(&maya.token)
        .json(&json!({ "imageUrls": ["https://cdn.example.com/vase.jpg"] }))
        .send()
        .await?;
    expect_status(res, StatusCode::CREATED).await?;

    Ok(())
}

#[tokio::test]
async fn only_the_author_may_edit_or_delete() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;
    let theo = server.register("theo").await?;

    let post = create_post(&server, &maya, "my vase").await?;
    let path = format!("/posts/{}", post["id"].as_str().unwrap_or_default());

    let res = server.put(&path).bearer_auth(&theo.token).json(&json!({ "content": "mine now" })).send().await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;
    let res = server.delete(&path).bearer_auth(&theo.token).send().await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;

    let res = server.put(&path).bearer_auth(&maya.token).json(&json!({ "content": "my glazed vase" })).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body["content"], "my glazed vase");

    let res = server.delete(&path).bearer_auth(&maya.token).send().await?;
    expect_status(res, StatusCode::NO_CONTENT).await?;
    expect_status(server.get(&path).send().await?, StatusCode::NOT_FOUND).await?;

    Ok(())
}

#[tokio::test]
async fn malformed_post_id_is_bad_request() -> Result<()> {
    let server = spawn_server().await?;

    let body = expect_status(server.get("/posts/not-a-uuid").send().await?, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["message"], "Invalid post id");

    Ok(())
}

#[tokio::test]
async fn comments_and_replies() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;
    let theo = server.register("theo").await?;

    let post = create_post(&server, &maya, "new loom").await?;
    let comments = format!("/posts/{}/comments", post["id"].as_str().unwrap_or_default());

    let res = server.post(&comments).bearer_auth(&theo.token).json(&json!({ "content": "Lovely!" })).send().await?;
    let body = expect_status(res, StatusCode::CREATED).await?;
    let comment_id = body["comments"][0]["id"].as_str().unwrap_or_default().to_string();
    assert_eq!(body["comments"][0]["authorName"], "theo");

    let res = server
        .post(&comments)
        .bearer_auth(&maya.token)
        .json(&json!({ "content": "Thanks", "parentId": comment_id }))
        .send()
        .await?;
    let body = expect_status(res, StatusCode::CREATED).await?;
    let reply_id = body["comments"][1]["id"].as_str().unwrap_or_default().to_string();

    let res = server
        .post(&comments)
        .bearer_auth(&theo.token)
        .json(&json!({ "content": "You're welcome", "parentId": reply_id }))
        .send()
        .await?;
    expect_status(res, StatusCode::CREATED).await?;

    let res = server.post(&comments).bearer_auth(&theo.token).json(&json!({ "content": "Separate thread" })).send().await?;
    expect_status(res, StatusCode::CREATED).await?;
    assert_eq!(server.count(&comments).await?, 4);

    // Empty comments and dangling parents are refused
    let res = server.post(&comments).bearer_auth(&theo.token).json(&json!({ "content": "" })).send().await?;
    expect_status(res, StatusCode::BAD_REQUEST).await?;
    let res = server
        .post(&comments)
        .bearer_auth(&theo.token)
        .json(&json!({ "content": "?", "parentId": uuid::Uuid::new_v4() }))
        .send()
        .await?;
    expect_status(res, StatusCode::BAD_REQUEST).await?;

    // Maya cannot edit Theo's comment, but as post author may delete it
    let one = format!("{}/{}", comments, comment_id);
    let res = server.put(&one).bearer_auth(&maya.token).json(&json!({ "content": "edited" })).send().await?;
    expect_status(res, StatusCode::FORBIDDEN).await?;

    // Deleting the root takes the reply and the reply's reply with it
    let res = server.delete(&one).bearer_auth(&maya.token).send().await?;
    expect_status(res, StatusCode::NO_CONTENT).await?;

    let remaining = expect_status(server.get(&comments).send().await?, StatusCode::OK).await?;
    let remaining = remaining.as_array().cloned().unwrap_or_default();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0]["content"], "Separate thread");
    assert!(remaining[0]["parentId"].is_null());

    Ok(())
}

#[tokio::test]
async fn reactions_toggle_and_replace() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;
    let theo = server.register("theo").await?;

    let post = create_post(&server, &maya, "new loom").await?;
    let reactions = format!("/posts/{}/reactions", post["id"].as_str().unwrap_or_default());

    let react = |reaction: &'static str| {
        server.post(&reactions).bearer_auth(&theo.token).json(&json!({ "reaction": reaction })).send()
    };

    let body = expect_status(react("LIKE").await?, StatusCode::OK).await?;
    assert_eq!(body["reactionCounts"]["LIKE"], 1);

    let body = expect_status(react("love").await?, StatusCode::OK).await?;
    assert_eq!(body["reactionCounts"]["LOVE"], 1);
    assert!(body["reactionCounts"].get("LIKE").is_none());

    // Same reaction again removes it
    let body = expect_status(react("LOVE").await?, StatusCode::OK).await?;
    assert!(body["reactions"].as_object().map(|r| r.is_empty()).unwrap_or(false));

    let body = expect_status(react("MEH").await?, StatusCode::BAD_REQUEST).await?;
    assert_eq!(body["success"], false);

    Ok(())
}

#[tokio::test]
async fn comment_and_reaction_notify_the_author() -> Result<()> {
    let server = spawn_server().await?;
    let maya = server.register("maya").await?;
    let theo = server.register("theo").await?;

    let post = create_post(&server, &maya, "new loom").await?;
    let id = post["id"].as_str().unwrap_or_default();

    let res = server
        .post(&format!("/posts/{}/comments", id))
        .bearer_auth(&theo.token)
        .json(&json!({ "content": "Lovely!" }))
        .send()
        .await?;
    expect_status(res, StatusCode::CREATED).await?;
    let res = server
        .post(&format!("/posts/{}/reactions", id))
        .bearer_auth(&theo.token)
        .json(&json!({ "reaction": "WOW" }))
        .send()
        .await?;
    expect_status(res, StatusCode::OK).await?;

    let res = server.get("/notifications/unread").bearer_auth(&maya.token).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    let kinds: Vec<&str> = body
        .as_array()
        .map(|n| n.iter().filter_map(|n| n["kind"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&"comment"));
    assert!(kinds.contains(&"reaction"));

    // Reacting to your own post notifies nobody
    let res = server
        .post(&format!("/posts/{}/reactions", id))
        .bearer_auth(&maya.token)
        .json(&json!({ "reaction": "LIKE" }))
        .send()
        .await?;
    expect_status(res, StatusCode::OK).await?;
    let res = server.get("/notifications/unread").bearer_auth(&maya.token).send().await?;
    let body = expect_status(res, StatusCode::OK).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    Ok(())
}
