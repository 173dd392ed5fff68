mod common;

use anyhow::Result;
use reqwest::{Method, StatusCode};
use serde_json::json;

use common::TestServer;
use starwars_api::config::AppConfig;

fn registration() -> serde_json::Value {
    json!({"email": "a@x.com", "name": "A", "password": "p", "is_active": true})
}

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "starwars-api");
    assert!(body["endpoints"]["favorites"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.post("/register", registration()).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["msg"], "User created");

    let (status, body) = server.post("/register", registration()).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let (_, body) = server.get("/users").await?;
    assert_eq!(body["users"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn registration_requires_every_field() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server
        .post("/register", json!({"email": "a@x.com", "name": "A", "is_active": true}))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You need to specify the password");
    Ok(())
}

#[tokio::test]
async fn non_json_body_is_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    let resp = reqwest::Client::new()
        .post(format!("{}/register", server.base_url))
        .body("email=a@x.com")
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = resp.json::<serde_json::Value>().await?;
    assert_eq!(body["error"], "You need to specify the request body as json object");
    Ok(())
}

#[tokio::test]
async fn login_checks_password() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.post("/register", registration()).await?;

    let (status, body) = server.post("/login", json!({"email": "a@x.com", "password": "p"})).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert!(body["user_id"].is_i64());

    let (status, wrong_password) = server
        .post("/login", json!({"email": "a@x.com", "password": "wrong"}))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown_email) = server
        .post("/login", json!({"email": "nobody@x.com", "password": "p"}))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password["error"], unknown_email["error"]);
    Ok(())
}

#[tokio::test]
async fn password_hash_never_leaves_the_server() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (user_id, token) = server.register_and_login("a@x.com", "A").await?;

    let (_, body) = server.get(&format!("/users/{}", user_id)).await?;
    assert_eq!(body["email"], "a@x.com");
    assert!(body.get("password").is_none());

    let (_, body) = server.send(Method::GET, "/protected", None, Some(&token)).await?;
    assert!(body["user"].get("password").is_none());
    Ok(())
}

#[tokio::test]
async fn protected_requires_bearer_token() -> Result<()> {
    let server = TestServer::spawn().await?;

    let (status, body) = server.get("/protected").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = server.send(Method::GET, "/protected", None, Some("not-a-jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn logout_revokes_the_token() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (user_id, token) = server.register_and_login("a@x.com", "A").await?;

    let (status, body) = server.send(Method::GET, "/protected", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user_id);

    let (status, body) = server.send(Method::POST, "/logout", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Token revoked");

    let (status, body) = server.send(Method::GET, "/protected", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "TOKEN_REVOKED");

    // Logging out again with the same token is rejected the same way
    let (status, _) = server.send(Method::POST, "/logout", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A fresh login still works
    let (status, body) = server.post("/login", json!({"email": "a@x.com", "password": "p"})).await?;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["token"].as_str().unwrap_or_default().to_string();
    let (status, _) = server.send(Method::GET, "/protected", None, Some(&fresh)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn legacy_flag_answers_revoked_tokens_with_404() -> Result<()> {
    let mut config = AppConfig::testing();
    config.security.legacy_revoked_status = true;
    let server = TestServer::spawn_with(config).await?;
    let (_, token) = server.register_and_login("a@x.com", "A").await?;

    server.send(Method::POST, "/logout", None, Some(&token)).await?;

    let (status, body) = server.send(Method::GET, "/protected", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "TOKEN_REVOKED");
    Ok(())
}

#[tokio::test]
async fn protected_is_404_once_the_user_is_deleted() -> Result<()> {
    let server = TestServer::spawn().await?;
    let (user_id, token) = server.register_and_login("a@x.com", "A").await?;

    let (status, _) = server.delete("/users", json!({"id": user_id})).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = server.send(Method::GET, "/protected", None, Some(&token)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    Ok(())
}
