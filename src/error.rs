// Admin API error types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Failure of a call against the admin API.
///
/// The three variants are shown to the operator the same way (one dismissable
/// notification) but stay distinguishable so that a `Validation` failure is
/// known never to have reached the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Required input missing or malformed, detected locally
    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    /// Request could not be completed (offline, DNS, connection reset)
    #[error("{0}")]
    Transport(String),

    /// Server answered outside the 2xx range, or with an unreadable body
    #[error("{message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Server,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation { .. } => ErrorKind::Validation,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Server { .. } => ErrorKind::Server,
        }
    }

    /// HTTP status reported by the server, if the request got that far
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation { message, .. } => message,
            ApiError::Transport(msg) => msg,
            ApiError::Server { message, .. } => message,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::Transport(_) => "TRANSPORT_ERROR",
            ApiError::Server { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                409 => "CONFLICT",
                422 => "UNPROCESSABLE_ENTITY",
                429 => "TOO_MANY_REQUESTS",
                502 => "BAD_GATEWAY",
                503 => "SERVICE_UNAVAILABLE",
                s if *s >= 500 => "INTERNAL_SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        let mut response = json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        });

        match self {
            ApiError::Validation { field_errors, .. } if !field_errors.is_empty() => {
                response["field_errors"] = json!(field_errors);
            }
            ApiError::Server { status, .. } => {
                response["status"] = json!(status);
            }
            _ => {}
        }

        response
    }
}

impl ApiError {
    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            field_errors,
        }
    }

    pub fn missing_field(field: &str) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), "This field is required".to_string());
        ApiError::validation(format!("Field '{}' is required", field), field_errors)
    }

    pub fn invalid_field(field: &str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        let mut field_errors = HashMap::new();
        field_errors.insert(field.to_string(), reason.clone());
        ApiError::validation(format!("Field '{}' {}", field, reason), field_errors)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport(message.into())
    }

    pub fn server(status: u16, message: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            message: message.into(),
        }
    }

    pub fn non_json(status: u16) -> Self {
        ApiError::server(status, "Server returned non-JSON response")
    }

    /// Build the error for a non-2xx response, preferring the server's own message.
    pub fn from_response(status: u16, content_type: Option<&str>, body: &[u8]) -> Self {
        let message = server_message(status, content_type, body)
            .unwrap_or_else(|| generic_status_message(status));
        ApiError::server(status, message)
    }
}

/// Extract a human-readable message from an error body.
fn server_message(status: u16, content_type: Option<&str>, body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let is_json = content_type.map(|ct| ct.contains("json")).unwrap_or(false)
        || text.starts_with('{');

    if is_json {
        let value: Value = serde_json::from_str(text).ok()?;
        return json_message(&value);
    }

    if text.contains("<!DOCTYPE") || text.contains("<html") {
        return Some(format!(
            "Server returned HTML error page (status: {}). Check if API endpoint is correct.",
            status
        ));
    }

    Some(text.to_string())
}

fn json_message(value: &Value) -> Option<String> {
    for key in ["detail", "message", "error"] {
        match value.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            // FastAPI validation errors: [{"loc": [...], "msg": "...", "type": "..."}]
            Some(Value::Array(items)) => {
                let msgs: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(Value::as_str))
                    .collect();
                if !msgs.is_empty() {
                    return Some(msgs.join("; "));
                }
            }
            Some(nested @ Value::Object(_)) => {
                if let Some(msg) = json_message(nested) {
                    return Some(msg);
                }
            }
            _ => {}
        }
    }
    None
}

pub fn generic_status_message(status: u16) -> String {
    let text = match status {
        400 => "Bad request",
        401 => "Authentication required",
        403 => "Access denied",
        404 => "Resource not found",
        409 => "Conflict with the current state of the resource",
        413 => "Uploaded file is too large",
        422 => "Submitted data is invalid",
        429 => "Too many requests, please try again later",
        500 => "Internal server error",
        502 => "Bad gateway",
        503 => "Service temporarily unavailable",
        504 => "Gateway timeout",
        _ => return format!("HTTP error! status: {}", status),
    };
    format!("{} (status: {})", text, status)
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

// Gateway handlers propagate upstream failures with the upstream status
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Transport(_) => StatusCode::BAD_GATEWAY,
            ApiError::Server { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
        };
        (status, Json(self.to_json())).into_response()
    }
}
