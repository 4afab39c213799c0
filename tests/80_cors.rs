mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};

use common::spawn_server;

const ROUTES: &[&str] = &[
    "/",
    "/health",
    "/auth/login",
    "/auth/register",
    "/posts",
    "/posts/00000000-0000-0000-0000-000000000000/comments",
    "/posts/00000000-0000-0000-0000-000000000000/reactions",
    "/products",
    "/orders",
    "/tutorials",
    "/tutorials/00000000-0000-0000-0000-000000000000/progress",
    "/messages",
    "/messages/unread/00000000-0000-0000-0000-000000000000",
    "/notifications/unread",
    "/users",
    "/users/00000000-0000-0000-0000-000000000000/follow",
    "/api/posts",
];

#[tokio::test]
async fn options_succeeds_on_every_route_without_auth() -> Result<()> {
    let server = spawn_server().await?;

    for route in ROUTES {
        let res = server
            .client
            .request(Method::OPTIONS, server.url(route))
            .header("origin", "https://maker.example.com")
            .send()
            .await?;

        assert_eq!(res.status(), StatusCode::OK, "OPTIONS {}", route);
        let headers = res.headers().clone();
        assert!(headers.contains_key("access-control-allow-origin"), "no allow-origin on {}", route);
        let methods = headers
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(methods.contains("DELETE"), "allow-methods on {} was {:?}", route, methods);
        assert!(res.text().await?.is_empty(), "OPTIONS {} had a body", route);
    }

    Ok(())
}

#[tokio::test]
async fn browser_preflight_lists_methods_and_headers() -> Result<()> {
    let server = spawn_server().await?;

    let res = server
        .client
        .request(Method::OPTIONS, server.url("/posts"))
        .header("origin", "https://maker.example.com")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type, authorization")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    let header = |name: &str| {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase()
    };
    assert_eq!(header("access-control-allow-origin"), "*");
    assert!(header("access-control-allow-methods").contains("put"));
    assert!(header("access-control-allow-headers").contains("authorization"));
    assert!(res.headers().get("access-control-allow-credentials").is_none());

    Ok(())
}

#[tokio::test]
async fn ordinary_responses_carry_cors_headers() -> Result<()> {
    let server = spawn_server().await?;

    let res = server.get("/health").header("origin", "https://maker.example.com").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("access-control-allow-origin").and_then(|v| v.to_str().ok()),
        Some("*")
    );
    assert!(res.headers().contains_key("access-control-allow-methods"));

    // Errors too
    let res = server.post("/posts").header("origin", "https://maker.example.com").send().await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(res.headers().contains_key("access-control-allow-origin"));

    Ok(())
}
