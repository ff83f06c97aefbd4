use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

use xolak::agent::AgentClient;
use xolak::config::AppConfig;
use xolak::routes::{self, AppState};
use xolak::telemetry;

// ─── Main ───────────────────────────────────────────────────────────────────

#[actix_web::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::from_env();
    if config.agent_id.is_none() {
        tracing::warn!("GRADIENT_AGENT_ID is not set; /query-agent will fail until it is");
    }

    let agent = AgentClient::new(config.agent_endpoint.clone(), config.agent_timeout)
        .context("failed to build HTTP client")?;
    let state = web::Data::new(AppState {
        agent,
        agent_id: config.agent_id.clone(),
    });
    let static_dir = config.static_dir.clone();

    tracing::info!(
        port = config.port,
        endpoint = %config.agent_endpoint,
        timeout = ?config.agent_timeout,
        "server starting"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(routes::cors())
            .app_data(state.clone())
            .configure(routes::configure)
            .configure(routes::static_files(&static_dir))
    })
    .bind(("0.0.0.0", config.port))
    .with_context(|| format!("failed to bind port {}", config.port))?
    .run()
    .await
    .context("server error")
}
