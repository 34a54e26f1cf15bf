use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GateConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Operator login
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, ttl_hours: u64) -> Self {
        let now = Utc::now();
        let exp = (now + Duration::hours(ttl_hours as i64)).timestamp();

        Self {
            sub: sub.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session secret not configured")]
    MissingSecret,

    #[error("Invalid session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// Sign a session token for `sub` with the gate's secret and lifetime.
pub fn issue(sub: &str, gate: &GateConfig) -> Result<String, SessionError> {
    if gate.session_secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }

    let claims = Claims::new(sub, gate.session_ttl_hours);
    let key = EncodingKey::from_secret(gate.session_secret.as_bytes());
    Ok(encode(&Header::default(), &claims, &key)?)
}

/// Check signature and expiry. Any failure means "not signed in".
pub fn verify(token: &str, secret: &str) -> Result<Claims, SessionError> {
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }

    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;
    let data = decode::<Claims>(token, &key, &validation)?;
    Ok(data.claims)
}
