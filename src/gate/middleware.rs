use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::{decide, is_authenticated, GateDecision};
use crate::config::GateConfig;

/// Redirect anonymous requests for protected pages to the login page, and
/// signed-in visits of the login page to the landing page (307 in both cases).
pub async fn gate_middleware(
    State(gate): State<Arc<GateConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let authenticated = is_authenticated(request.headers(), &gate);

    match decide(&path, authenticated, &gate) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::RedirectToLogin => {
            tracing::info!(%path, "unauthenticated request redirected to login");
            Redirect::temporary(&gate.login_path).into_response()
        }
        GateDecision::RedirectToLanding => {
            tracing::info!(%path, "signed-in request redirected to landing page");
            Redirect::temporary(&gate.landing_path).into_response()
        }
    }
}
