mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use yaxshi_admin::api::HttpClient;
use yaxshi_admin::config::{AppConfig, GateConfig, SessionMode};
use yaxshi_admin::gateway::{router, AppState};

fn settings_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("yaxshi-gateway-{}-{}", name, std::process::id()))
        .join("control.json")
}

fn app(upstream: &common::Upstream, gate: GateConfig, name: &str) -> Router {
    router(AppState::new(HttpClient::new(&upstream.api_url), gate, settings_path(name)))
}

fn get(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn login(username: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!("username={}&password={}", username, password)))
        .unwrap()
}

fn location(response: &Response) -> Option<&str> {
    response.headers().get(header::LOCATION).and_then(|v| v.to_str().ok())
}

async fn json_body(response: Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// `name=value` part of the session cookie handed out by a successful login.
async fn sign_in(app: &Router) -> Result<String> {
    let response = app.clone().oneshot(login("admin", common::PASSWORD)).await?;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("session cookie");
    Ok(set_cookie.split(';').next().unwrap_or_default().to_string())
}

#[tokio::test]
async fn anonymous_screen_request_redirects_to_login() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "anon");

    for path in ["/users", "/fondomats/4", "/control"] {
        let response = app.clone().oneshot(get(path, None)).await?;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{}", path);
        assert_eq!(location(&response), Some("/login"));
    }
    assert!(upstream.recorder.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "health");

    let response = app.oneshot(get("/health", None)).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["session_mode"], "signed");
    Ok(())
}

#[tokio::test]
async fn login_sets_signed_session_and_unlocks_screens() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "login");

    let cookie = sign_in(&app).await?;
    assert!(cookie.starts_with("session="));
    assert_ne!(cookie, "session=true");

    let response = app.clone().oneshot(get("/users?status=blocked", Some(&cookie))).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["resource"], "users");
    assert_eq!(body["data"]["cached"], 3);
    assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"]["items"][0]["username"], "bekzod");
    Ok(())
}

#[tokio::test]
async fn wrong_password_sets_no_cookie() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "wrong");

    let response = app.oneshot(login("admin", "nope")).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = json_body(response).await?;
    assert_eq!(body["message"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn signed_in_login_visit_goes_to_dashboard() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "landing");
    let cookie = sign_in(&app).await?;

    let response = app.oneshot(get("/login", Some(&cookie))).await?;

    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), Some("/dashboard"));
    Ok(())
}

#[tokio::test]
async fn forged_or_tampered_session_is_rejected() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "forged");
    let cookie = sign_in(&app).await?;

    for forged in ["session=true".to_string(), format!("{}x", cookie)] {
        let response = app.clone().oneshot(get("/vendors", Some(&forged))).await?;
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }
    Ok(())
}

#[tokio::test]
async fn flag_mode_accepts_plain_cookie() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let mut gate = AppConfig::development().gate;
    gate.session_mode = SessionMode::Flag;
    gate.cookie_name = "auth".into();
    let app = app(&upstream, gate, "flag");

    let response = app.oneshot(get("/vendors?status=inactive", Some("auth=true"))).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["data"]["stats"]["total"], 2);
    assert_eq!(body["data"]["items"][0]["name"], "Makro");
    Ok(())
}

#[tokio::test]
async fn failed_first_load_is_a_bad_gateway() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "down");
    let cookie = sign_in(&app).await?;

    let response = app.oneshot(get("/rewards", Some(&cookie))).await?;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await?;
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
    assert_eq!(body["error"], "db down");
    Ok(())
}

#[tokio::test]
async fn control_screen_shows_defaults_without_a_file() -> Result<()> {
    let upstream = common::spawn_upstream().await?;
    let app = app(&upstream, AppConfig::development().gate, "control");
    let cookie = sign_in(&app).await?;

    let response = app.oneshot(get("/control", Some(&cookie))).await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert!(body["data"]["pricing"]["containerPrice"].is_number());
    Ok(())
}
