use std::panic::AssertUnwindSafe;

use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{App, HttpResponse, HttpServer, ResponseError, web};
use anyhow::{Context, Result};
use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::llm::CompletionClient;
use crate::models::DeckFeedback;
use crate::stages::{AgentConfig, analyze_deck};

/// Largest request body accepted by the analyze endpoint
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Where the HTTP server listens
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

/// Shared per-server state: the injected completion client and agent settings
pub struct AppState<C> {
    pub client: C,
    pub agents: AgentConfig,
}

impl<C> AppState<C> {
    pub fn new(client: C, agents: AgentConfig) -> Self {
        Self { client, agents }
    }
}

/// Request-level failures
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Valid deck content is required")]
    InvalidDeck,
    /// The cause is logged, never sent to the client
    #[error("Failed to process deck content")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidDeck => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Internal(cause) = self {
            error!("Error processing deck: {}", cause);
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: self.to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub feedback: DeckFeedback,
}

/// POST /api/analyze - segment a deck and return agent feedback
///
/// Body: `{"deckContent": "<raw deck text>"}`
pub async fn analyze<C: CompletionClient + 'static>(
    state: web::Data<AppState<C>>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let deck = body
        .get("deckContent")
        .and_then(serde_json::Value::as_str)
        .filter(|content| !content.is_empty())
        .ok_or(ApiError::InvalidDeck)?;

    info!("Analyzing deck ({} bytes)", deck.len());

    let feedback = AssertUnwindSafe(analyze_deck(&state.client, deck, &state.agents))
        .catch_unwind()
        .await
        .map_err(|panic| ApiError::Internal(panic_message(panic.as_ref())))?;

    Ok(HttpResponse::Ok().json(AnalyzeResponse {
        success: true,
        feedback,
    }))
}

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

/// Register routes and body handling for a given client type
pub fn routes<C: CompletionClient + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/analyze", web::post().to(analyze::<C>))
        .route("/health", web::get().to(health));
}

/// Any origin may call the API, so browser frontends can be hosted elsewhere
pub fn cors() -> Cors {
    Cors::permissive()
}

/// Malformed or oversized JSON bodies get the same 400 as a missing field
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req| {
            info!("Rejected request body: {}", err);
            ApiError::InvalidDeck.into()
        })
}

/// Run the HTTP server until it is shut down
pub async fn run_server<C>(config: ServerConfig, client: C, agents: AgentConfig) -> Result<()>
where
    C: CompletionClient + Send + Sync + 'static,
{
    let state = web::Data::new(AppState::new(client, agents));

    info!("Starting server at http://{}:{}", config.bind, config.port);

    HttpServer::new(move || {
        App::new()
            .wrap(cors())
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::<C>)
    })
    .bind((config.bind.as_str(), config.port))
    .with_context(|| format!("Failed to bind {}:{}", config.bind, config.port))?
    .run()
    .await
    .context("HTTP server failed")
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        format!("panic: {}", message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        format!("panic: {}", message)
    } else {
        "panic during analysis".to_string()
    }
}
