use anyhow::Context;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use yaxshi_admin::config::SessionMode;
use yaxshi_admin::{cli, config, gateway, is_production};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so YAXSHI_API_BASE_URL, GATE_SESSION_SECRET, etc. apply to cargo run
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    tracing::info!(
        "Starting Yaxshi admin gateway in {:?} mode against {}",
        config.environment,
        config.api.api_url()
    );

    match config.gate.session_mode {
        SessionMode::Signed if config.gate.session_secret.is_empty() => {
            anyhow::bail!("GATE_SESSION_SECRET must be set when sessions are signed");
        }
        SessionMode::Flag if is_production!() => {
            tracing::warn!("flag sessions can be forged by any client; use GATE_SESSION_MODE=signed");
        }
        _ => {}
    }

    let settings_path = cli::config::settings_file()?;
    let state = gateway::AppState::from_config(config, settings_path);

    let app = gateway::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(session_mode = ?config.gate.session_mode, "gateway listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server")?;
    Ok(())
}
