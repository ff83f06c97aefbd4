use std::path::Path;

use actix_cors::Cors;
use actix_files as fs;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::agent::AgentClient;
use crate::error::{AgentError, ApiError};
use crate::normalize::normalize;

// ─── Shared State ───────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct AppState {
    pub agent: AgentClient,
    pub agent_id: Option<String>,
}

#[derive(Deserialize)]
pub struct QueryRequest {
    /// `null` and a missing key both land here as `None`.
    query: Option<String>,
}

// ─── Handlers ───────────────────────────────────────────────────────────────

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "time": chrono::Utc::now(),
    }))
}

pub async fn query_agent(
    state: web::Data<AppState>,
    body: web::Json<QueryRequest>,
) -> Result<HttpResponse, ApiError> {
    let query = match body.query.as_deref() {
        Some(query) if !query.is_empty() => query,
        _ => return Err(ApiError::InvalidRequest("Query is required")),
    };

    tracing::info!(query, "processing query");

    let agent_id = state
        .agent_id
        .as_deref()
        .ok_or(AgentError::MissingAgentId)
        .inspect_err(|e| tracing::error!(error = %e, "agent call failed"))?;

    let raw = state
        .agent
        .invoke(query, agent_id)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "agent call failed"))?;

    let response = normalize(&raw).inspect_err(|e| {
        tracing::error!(error = %e, raw = %raw, "failed to normalize agent response")
    })?;

    tracing::info!(
        recommendations = response.recommendations.len(),
        "query answered"
    );
    Ok(HttpResponse::Ok().json(response))
}

// ─── App Wiring ─────────────────────────────────────────────────────────────

/// Maps body extraction failures to the API's 400 shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(1048576)
        .error_handler(|err, _req| {
            tracing::warn!(error = %err, "rejected request body");
            let response = HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid request body"
            }));
            actix_web::error::InternalError::from_response(err, response).into()
        })
}

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
}

/// API routes. Register before [`static_files`] so `/` does not shadow them.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/health", web::get().to(health))
        .route("/query-agent", web::post().to(query_agent));
}

/// Serves the built frontend when the directory exists.
pub fn static_files(dir: &Path) -> impl FnOnce(&mut web::ServiceConfig) + '_ {
    move |cfg| {
        if dir.is_dir() {
            cfg.service(fs::Files::new("/", dir).index_file("index.html"));
        }
    }
}
