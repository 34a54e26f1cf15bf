#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub const API_PREFIX: &str = "/admin/api/v1";
pub const PASSWORD: &str = "secret";

/// One request as seen by the fake upstream.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: Method,
    pub uri: String,
    pub body: Vec<u8>,
}

impl Seen {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl Recorder {
    pub fn requests(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn find(&self, method: Method, uri_prefix: &str) -> Option<Seen> {
        self.requests()
            .into_iter()
            .find(|s| s.method == method && s.uri.starts_with(uri_prefix))
    }

    fn push(&self, seen: Seen) {
        self.seen.lock().unwrap().push(seen);
    }
}

/// Fake admin API bound to a free local port, alive for the current test's runtime.
pub struct Upstream {
    pub base_url: String,
    pub api_url: String,
    pub recorder: Recorder,
}

pub async fn spawn_upstream() -> Result<Upstream> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind fake upstream")?;

    let recorder = Recorder::default();
    let app = fake_api(recorder.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base_url = format!("http://127.0.0.1:{}", port);
    Ok(Upstream {
        api_url: format!("{}{}", base_url, API_PREFIX),
        base_url,
        recorder,
    })
}

/// A URL nothing listens on.
pub fn dead_api_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}{}", port, API_PREFIX))
}

fn fake_api(recorder: Recorder) -> Router {
    let api = Router::new()
        .route("/dashboard/", get(dashboard))
        .route("/users/", get(users))
        .route("/users/:id/block", post(action_ok))
        .route("/users/:id/unblock", post(action_ok))
        .route("/vendors/", get(vendors).post(create_vendor))
        .route("/bottles/", get(bottles).post(create_bottle))
        .route("/rewards/", get(rewards_down))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn_with_state(recorder, record))
}

async fn record(State(recorder): State<Recorder>, request: axum::extract::Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();
    recorder.push(Seen {
        method: parts.method.clone(),
        uri: parts.uri.to_string(),
        body: bytes.to_vec(),
    });
    next.run(axum::extract::Request::from_parts(parts, axum::body::Body::from(bytes)))
        .await
}

pub fn user(id: i64, username: &str, status: &str) -> Value {
    json!({
        "id": id, "username": username, "phone": "+99890000000", "first_name": username, "last_name": null,
        "email": format!("{}@mail.uz", username), "is_active": status == "active", "status": status,
        "role": "user", "points": 10 * id, "created_at": "2024-02-01T10:00:00Z"
    })
}

pub fn vendor(id: i64, name: &str, active: bool) -> Value {
    json!({
        "id": id, "name": name, "login": name.to_lowercase(), "contact_email": "info@vendor.uz",
        "contact_phone": "+998712000000", "terms": "", "commission_percent": "10.00",
        "is_active": active, "created_at": "2024-01-01T00:00:00", "updated_at": "2024-01-01T00:00:00"
    })
}

pub fn bottle(id: i64, name: &str, material: &str, sku: &str) -> Value {
    json!({
        "id": id, "name": name, "size": 0.5, "material": material, "sku": sku, "image": null,
        "created_at": "2024-03-01T00:00:00Z", "updated_at": "2024-03-01T00:00:00Z"
    })
}

async fn dashboard() -> Json<Value> {
    Json(json!({
        "total_users": 3, "active_fandomats": 2, "total_issued_rewards": 40, "total_income": "125000.00",
        "rewards": [
            {"id": 1, "name": "Cinema ticket", "issued_total": 10},
            {"id": 2, "name": "Coffee", "issued_total": 30}
        ]
    }))
}

async fn users() -> Json<Value> {
    Json(json!({
        "users": [user(1, "aziz", "active"), user(2, "dilnoza", "active"), user(3, "bekzod", "blocked")],
        "stats": {"total": 3, "active": 2, "blocked": 1, "new_this_month": 0}
    }))
}

async fn action_ok(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({ "id": id, "ok": true }))
}

async fn vendors() -> Json<Value> {
    Json(json!([vendor(1, "Korzinka", true), vendor(2, "Makro", false)]))
}

async fn create_vendor(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let name = body["name"].as_str().unwrap_or("unnamed");
    let mut created = vendor(10, name, body["is_active"].as_bool().unwrap_or(true));
    created["commission_percent"] = body["commission_percent"].clone();
    (
        StatusCode::CREATED,
        Json(json!({ "vendor": created, "login": "vendor10", "password": "pw-123" })),
    )
}

async fn bottles(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let all = vec![
        bottle(1, "Cola 0.5", "plastic", "COLA-05"),
        bottle(2, "Fanta can", "aluminum", "FANTA-033"),
        bottle(3, "Water 1.5", "plastic", "WATER-15"),
    ];
    let filtered: Vec<Value> = all
        .into_iter()
        .filter(|b| match params.get("material") {
            Some(material) => b["material"] == json!(material),
            None => true,
        })
        .collect();
    let total = filtered.len();
    Json(json!({ "bottles": filtered, "total": total }))
}

async fn create_bottle(uri: Uri, body: Bytes) -> Response {
    let text = String::from_utf8_lossy(&body);
    if !text.contains("name=\"sku\"") {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({"detail": "sku required", "uri": uri.to_string()})))
            .into_response();
    }
    (StatusCode::CREATED, Json(bottle(7, "Pepsi 1L", "plastic", "PEPSI-1"))).into_response()
}

async fn rewards_down() -> (StatusCode, Json<Value>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": "db down" })))
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["password"] == json!(PASSWORD) {
        Json(json!({ "access_token": "upstream-token", "token_type": "bearer" })).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "detail": "Invalid credentials" }))).into_response()
    }
}

async fn logout() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(header::CACHE_CONTROL, "no-store")])
}
