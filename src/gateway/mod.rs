//! Admin gateway: the gated page routes, each rendering a screen's view model as JSON.

pub mod handlers;
pub mod response;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::HttpClient;
use crate::config::{AppConfig, GateConfig};
use crate::gate::gate_middleware;
use crate::resources::AdminApi;

pub use response::{ApiResponse, ApiResult};

#[derive(Clone)]
pub struct AppState {
    pub api: AdminApi,
    pub gate: Arc<GateConfig>,
    /// Control settings file shared with the operator CLI
    pub settings_path: PathBuf,
}

impl AppState {
    pub fn new(client: HttpClient, gate: GateConfig, settings_path: PathBuf) -> Self {
        Self {
            api: AdminApi::new(client),
            gate: Arc::new(gate),
            settings_path,
        }
    }

    pub fn from_config(config: &AppConfig, settings_path: PathBuf) -> Self {
        Self::new(
            HttpClient::new(config.api.api_url()),
            config.gate.clone(),
            settings_path,
        )
    }
}

pub fn router(state: AppState) -> Router {
    let gate = state.gate.clone();

    Router::new()
        // Public
        .route("/health", get(handlers::health))
        .route("/login", get(handlers::login_form).post(handlers::login))
        .route("/logout", post(handlers::logout))
        // Screens (protected by prefix)
        .route("/dashboard", get(handlers::dashboard))
        .route("/users", get(handlers::users))
        .route("/vendors", get(handlers::vendors))
        .route("/vendors/:id", get(handlers::vendor_detail))
        .route("/bottles", get(handlers::bottles))
        .route("/fondomats", get(handlers::fondomats))
        .route("/fondomats/:id", get(handlers::fondomat_detail))
        .route("/rewards", get(handlers::rewards))
        .route("/control", get(handlers::control))
        .layer(middleware::from_fn_with_state(gate, gate_middleware))
        .with_state(state)
}
