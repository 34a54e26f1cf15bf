use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub gate: GateConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_prefix: String,
}

/// How the gate decides whether a request carries a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Legacy placeholder: a cookie whose value is `true` is trusted as-is.
    /// This is a UX redirect only and must not be treated as access control.
    Flag,
    /// Cookie carries an HS256-signed token with an expiry.
    Signed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    pub session_mode: SessionMode,
    pub cookie_name: String,
    pub session_secret: String,
    pub session_ttl_hours: u64,
    pub login_path: String,
    pub landing_path: String,
    /// Path prefixes that require a session. `/` guards every path except
    /// `login_path`. Blank entries from `GATE_PROTECTED_PREFIXES` are dropped.
    pub protected_prefixes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

impl ApiConfig {
    /// Full URL of the admin API, e.g. `https://api.yaxshi.link/admin/api/v1`
    pub fn api_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.api_prefix
        )
    }
}

impl SessionMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flag" | "legacy" => Some(SessionMode::Flag),
            "signed" | "jwt" => Some(SessionMode::Signed),
            _ => None,
        }
    }

    fn default_cookie_name(&self) -> &'static str {
        match self {
            SessionMode::Flag => "auth",
            SessionMode::Signed => "session",
        }
    }
}

impl GateConfig {
    fn with_mode(mode: SessionMode, secret: &str, ttl_hours: u64) -> Self {
        Self {
            session_mode: mode,
            cookie_name: mode.default_cookie_name().to_string(),
            session_secret: secret.to_string(),
            session_ttl_hours: ttl_hours,
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
            protected_prefixes: default_protected_prefixes(),
        }
    }
}

pub fn default_protected_prefixes() -> Vec<String> {
    [
        "/dashboard",
        "/users",
        "/rewards",
        "/vendors",
        "/bottles",
        "/fondomats",
        "/control",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect()
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("YAXSHI_API_BASE_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("YAXSHI_API_PREFIX") {
            self.api.api_prefix = v;
        }

        // Gate overrides
        if let Ok(v) = env::var("GATE_SESSION_MODE") {
            if let Some(mode) = SessionMode::parse(&v) {
                if mode != self.gate.session_mode {
                    self.gate.cookie_name = mode.default_cookie_name().to_string();
                }
                self.gate.session_mode = mode;
            }
        }
        if let Ok(v) = env::var("GATE_COOKIE_NAME") {
            self.gate.cookie_name = v;
        }
        if let Ok(v) = env::var("GATE_SESSION_SECRET") {
            self.gate.session_secret = v;
        }
        if let Ok(v) = env::var("GATE_SESSION_TTL_HOURS") {
            self.gate.session_ttl_hours = v.parse().unwrap_or(self.gate.session_ttl_hours);
        }
        if let Ok(v) = env::var("GATE_PROTECTED_PREFIXES") {
            self.gate.protected_prefixes = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Server overrides
        if let Some(port) = env::var("YAXSHI_ADMIN_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                api_prefix: "/admin/api/v1".to_string(),
            },
            gate: GateConfig::with_mode(SessionMode::Signed, "dev-only-session-secret", 24 * 7),
            server: ServerConfig { port: 3000 },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://api.yaxshi.link".to_string(),
                api_prefix: "/admin/api/v1".to_string(),
            },
            gate: GateConfig::with_mode(SessionMode::Signed, "", 24),
            server: ServerConfig { port: 3000 },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.yaxshi.link".to_string(),
                api_prefix: "/admin/api/v1".to_string(),
            },
            // Secret must come from GATE_SESSION_SECRET; an empty secret rejects every session
            gate: GateConfig::with_mode(SessionMode::Signed, "", 8),
            server: ServerConfig { port: 3000 },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.api.api_url(), "http://localhost:8000/admin/api/v1");
        assert_eq!(config.gate.session_mode, SessionMode::Signed);
        assert_eq!(config.gate.cookie_name, "session");
        assert!(!config.gate.session_secret.is_empty());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.api.api_url(), "https://api.yaxshi.link/admin/api/v1");
        assert!(config.gate.session_secret.is_empty());
        assert_eq!(config.gate.landing_path, "/dashboard");
    }

    #[test]
    fn protected_prefixes_cover_every_admin_screen() {
        let prefixes = default_protected_prefixes();
        for screen in ["/dashboard", "/users", "/vendors", "/bottles", "/fondomats", "/rewards", "/control"] {
            assert!(prefixes.iter().any(|p| p == screen), "{screen} not protected");
        }
    }

    #[test]
    fn session_mode_parsing() {
        assert_eq!(SessionMode::parse("flag"), Some(SessionMode::Flag));
        assert_eq!(SessionMode::parse(" Signed "), Some(SessionMode::Signed));
        assert_eq!(SessionMode::parse("cookie"), None);
    }
}
