mod common;

use anyhow::Result;
use reqwest::StatusCode;

use common::{expect_status, spawn_server};

#[tokio::test]
async fn health_reports_connected_store() -> Result<()> {
    let server = spawn_server().await?;

    let body = expect_status(server.get("/health").send().await?, StatusCode::OK).await?;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "drycraft-api");
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].is_string());

    Ok(())
}

#[tokio::test]
async fn routes_are_also_served_under_api_prefix() -> Result<()> {
    let server = spawn_server().await?;

    let body = expect_status(server.get("/api/health").send().await?, StatusCode::OK).await?;
    assert_eq!(body["status"], "ok");

    Ok(())
}

#[tokio::test]
async fn unknown_route_is_json_404() -> Result<()> {
    let server = spawn_server().await?;

    let body = expect_status(server.get("/no/such/route").send().await?, StatusCode::NOT_FOUND).await?;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    Ok(())
}

#[tokio::test]
async fn unsupported_method_is_json_405() -> Result<()> {
    let server = spawn_server().await?;

    let res = server.client.patch(server.url("/products")).send().await?;
    let body = expect_status(res, StatusCode::METHOD_NOT_ALLOWED).await?;
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

    Ok(())
}
