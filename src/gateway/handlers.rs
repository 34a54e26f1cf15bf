use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::response::{failure, ApiResponse, ApiResult};
use super::AppState;
use crate::controller::{ListResource, Notice, ResourceList, Screen};
use crate::error::ApiError;
use crate::gate;
use crate::models::{BottleMaterial, BottleQuery, DetailedFondomat, FondomatStatus, Vendor, VendorState};
use crate::resources::Credentials;
use crate::settings::ControlSettings;

/// Query string shared by the list screens; each screen reads its own category.
#[derive(Debug, Default, Deserialize)]
pub struct ScreenParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub material: Option<String>,
    pub vendor: Option<i64>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

/// JSON view model of one list screen.
#[derive(Serialize)]
pub struct ScreenView<'a, E, S> {
    pub resource: &'static str,
    pub items: Vec<&'a E>,
    pub cached: usize,
    pub stats: &'a S,
    pub search: &'a str,
    pub stale_error: Option<&'a str>,
    pub notices: &'a [Notice],
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn render<R>(list: &ResourceList<R>) -> Response
where
    R: ListResource,
    R::Entity: Serialize,
    R::Stats: Serialize,
{
    match list.screen() {
        Screen::Content { stale_error, .. } => ApiResponse::success(ScreenView {
            resource: R::NAME,
            items: list.view(),
            cached: list.items().len(),
            stats: list.stats(),
            search: &list.filter.search,
            stale_error,
            notices: list.notices(),
        })
        .into_response(),
        Screen::Unavailable { message } => failure(StatusCode::BAD_GATEWAY, "UPSTREAM_UNAVAILABLE", message),
        Screen::Loading => failure(StatusCode::SERVICE_UNAVAILABLE, "LOADING", "Screen is still loading"),
    }
}

fn parse_category<T: std::str::FromStr<Err = String>>(field: &str, raw: Option<&str>) -> Result<Option<T>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty() && *s != "all") {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: String| ApiError::invalid_field(field, e)),
        None => Ok(None),
    }
}

fn parse_vendor_state(raw: Option<&str>) -> Result<Option<VendorState>, ApiError> {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        None | Some("") | Some("all") => Ok(None),
        Some("active") => Ok(Some(VendorState::Active)),
        Some("inactive") => Ok(Some(VendorState::Inactive)),
        Some(other) => Err(ApiError::invalid_field(
            "status",
            format!("unknown status '{}', expected active or inactive", other),
        )),
    }
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    ApiResponse::success(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "session_mode": state.gate.session_mode,
    }))
}

pub async fn login_form(State(state): State<AppState>) -> impl IntoResponse {
    ApiResponse::success(json!({
        "action": state.gate.login_path,
        "method": "POST",
        "fields": ["username", "password"],
    }))
}

pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if form.username.trim().is_empty() {
        return ApiError::missing_field("username").into_response();
    }
    if form.password.is_empty() {
        return ApiError::missing_field("password").into_response();
    }

    let credentials = Credentials {
        username: form.username.trim().to_string(),
        password: form.password,
    };
    if let Err(err) = state.api.auth.login(&credentials).await {
        tracing::warn!(username = %credentials.username, error = %err, "login rejected");
        return err.into_response();
    }

    let value = match gate::session_value(&credentials.username, &state.gate) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(error = %err, "failed to issue session");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR", &err.to_string());
        }
    };

    let cookie = match HeaderValue::from_str(&gate::set_cookie(&state.gate, &value)) {
        Ok(cookie) => cookie,
        Err(err) => {
            tracing::error!(error = %err, "session cookie is not a valid header");
            return failure(StatusCode::INTERNAL_SERVER_ERROR, "SESSION_ERROR", "Invalid session cookie");
        }
    };

    tracing::info!(username = %credentials.username, "operator signed in");
    let mut response = Redirect::to(&state.gate.landing_path).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    response
}

pub async fn logout(State(state): State<AppState>) -> Response {
    if let Err(err) = state.api.auth.logout().await {
        tracing::warn!(error = %err, "upstream logout failed; clearing session anyway");
    }

    let mut response = Redirect::to(&state.gate.login_path).into_response();
    if let Ok(cookie) = HeaderValue::from_str(&gate::clear_cookie(&state.gate)) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

pub async fn dashboard(State(state): State<AppState>, Query(params): Query<ScreenParams>) -> Response {
    let mut list = ResourceList::new(state.api.dashboard.clone());
    list.refresh().await;
    list.set_search(params.search.unwrap_or_default());
    render(&list)
}

pub async fn users(State(state): State<AppState>, Query(params): Query<ScreenParams>) -> Response {
    let status = params
        .status
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty() && s != "all");

    let mut list = ResourceList::new(state.api.users.clone());
    list.refresh().await;
    list.set_search(params.search.unwrap_or_default());
    list.set_category(status);
    render(&list)
}

pub async fn vendors(State(state): State<AppState>, Query(params): Query<ScreenParams>) -> Response {
    let status = match parse_vendor_state(params.status.as_deref()) {
        Ok(status) => status,
        Err(err) => return err.into_response(),
    };

    let mut list = ResourceList::new(state.api.vendors.clone());
    list.refresh().await;
    list.set_search(params.search.unwrap_or_default());
    list.set_category(status);
    render(&list)
}

pub async fn vendor_detail(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Vendor> {
    Ok(ApiResponse::success(state.api.vendors.get(id).await?))
}

/// Bottles are filtered by the API itself, so search and material go upstream.
pub async fn bottles(State(state): State<AppState>, Query(params): Query<ScreenParams>) -> Response {
    let material = match parse_category::<BottleMaterial>("material", params.material.as_deref()) {
        Ok(material) => material,
        Err(err) => return err.into_response(),
    };

    let query = BottleQuery {
        search: params.search,
        material,
        skip: params.skip,
        limit: params.limit,
    };
    let mut list = ResourceList::with_query(state.api.bottles.clone(), query);
    list.refresh().await;
    render(&list)
}

pub async fn fondomats(State(state): State<AppState>, Query(params): Query<ScreenParams>) -> Response {
    let status = match parse_category::<FondomatStatus>("status", params.status.as_deref()) {
        Ok(status) => status,
        Err(err) => return err.into_response(),
    };

    let mut list = ResourceList::new(state.api.fondomats.clone());
    list.refresh().await;
    list.set_search(params.search.unwrap_or_default());
    list.set_category(status);
    render(&list)
}

pub async fn fondomat_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<DetailedFondomat> {
    Ok(ApiResponse::success(state.api.fondomats.get(id).await?))
}

pub async fn rewards(State(state): State<AppState>, Query(params): Query<ScreenParams>) -> Response {
    let mut list = ResourceList::new(state.api.rewards.clone());
    list.refresh().await;
    list.set_search(params.search.unwrap_or_default());
    list.set_category(params.vendor);
    render(&list)
}

pub async fn control(State(state): State<AppState>) -> Response {
    match ControlSettings::load(&state.settings_path) {
        Ok(settings) => ApiResponse::success(settings).into_response(),
        Err(err) => {
            tracing::warn!(path = %state.settings_path.display(), error = %err, "cannot read control settings");
            failure(StatusCode::INTERNAL_SERVER_ERROR, "SETTINGS_ERROR", &err.to_string())
        }
    }
}
