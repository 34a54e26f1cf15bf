//! Request-time authentication gate for the admin pages.
//!
//! In `flag` mode the gate only trusts a cookie whose value is `true`; it is a
//! UX redirect, not an access-control boundary. `signed` mode checks an
//! HS256 session token with an expiry on every request.

pub mod middleware;
pub mod session;

pub use middleware::gate_middleware;
pub use session::{Claims, SessionError};

use axum::http::{header, HeaderMap};

use crate::config::{GateConfig, SessionMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    RedirectToLogin,
    RedirectToLanding,
}

/// `/users` guards `/users` and `/users/...` but not `/usersx`. A bare `/`
/// guards every path; the login page stays reachable through [`decide`].
pub fn is_protected(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        let prefix = prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    })
}

pub fn decide(path: &str, authenticated: bool, gate: &GateConfig) -> GateDecision {
    if authenticated {
        if path == gate.login_path {
            return GateDecision::RedirectToLanding;
        }
        return GateDecision::Allow;
    }

    if path == gate.login_path {
        return GateDecision::Allow;
    }

    if is_protected(path, &gate.protected_prefixes) {
        GateDecision::RedirectToLogin
    } else {
        GateDecision::Allow
    }
}

/// Value of one cookie from the `Cookie` request headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
}

pub fn is_authenticated(headers: &HeaderMap, gate: &GateConfig) -> bool {
    let Some(value) = cookie_value(headers, &gate.cookie_name) else {
        return false;
    };

    match gate.session_mode {
        SessionMode::Flag => value == "true",
        SessionMode::Signed => session::verify(&value, &gate.session_secret).is_ok(),
    }
}

/// Cookie value to hand out after a successful upstream login.
pub fn session_value(login: &str, gate: &GateConfig) -> Result<String, SessionError> {
    match gate.session_mode {
        SessionMode::Flag => Ok("true".to_string()),
        SessionMode::Signed => session::issue(login, gate),
    }
}

pub fn set_cookie(gate: &GateConfig, value: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        gate.cookie_name,
        value,
        gate.session_ttl_hours * 3600
    )
}

pub fn clear_cookie(gate: &GateConfig) -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", gate.cookie_name)
}
