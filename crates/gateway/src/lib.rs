//! HTTP API gateway for the Folio portfolio assistant.
//!
//! Exposes the completion endpoint and the capability probe:
//!
//! - `POST /chat`   — validate, trim, build the system prompt, run the
//!   failover sequence, return the reply
//! - `GET  /health` — report which provider credentials are configured,
//!   without contacting any provider
//!
//! Built on Axum. Per-request processing is strictly sequential; the
//! corpus and orchestrator are read-only behind `Arc`, so concurrent
//! requests share them without locking.

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use folio_core::provider::ProviderId;
use folio_core::request::ConversationRequest;
use folio_core::trim_history;
use folio_corpus::{KnowledgeCorpus, build_system_prompt};
use folio_providers::FailoverOrchestrator;

/// Shared application state for the gateway.
pub struct GatewayState {
    corpus: Arc<KnowledgeCorpus>,
    orchestrator: Arc<FailoverOrchestrator>,
    default_locale: String,
    started_at: DateTime<Utc>,
}

impl GatewayState {
    pub fn new(
        corpus: KnowledgeCorpus,
        orchestrator: Arc<FailoverOrchestrator>,
        default_locale: String,
    ) -> Self {
        Self {
            corpus: Arc::new(corpus),
            orchestrator,
            default_locale,
            started_at: Utc::now(),
        }
    }
}

type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied: permissive CORS (the portfolio frontend is served
/// from a different origin), request body size limit (64 KB — chat
/// payloads are small), HTTP trace logging.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
pub async fn start(
    config: folio_config::AppConfig,
    corpus: KnowledgeCorpus,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let orchestrator = Arc::new(folio_providers::build_orchestrator(&config));
    info!(
        primary = orchestrator.primary_configured(),
        secondary = orchestrator.secondary_configured(),
        "Provider credentials detected"
    );

    let state = Arc::new(GatewayState::new(
        corpus,
        orchestrator,
        config.default_locale.clone(),
    ));
    let app = build_router(state);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Response bodies ---

#[derive(Serialize)]
struct ChatReply {
    reply: String,
    provider: ProviderId,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Serialize)]
struct UnavailableBody {
    error: String,
    details: FailureDetails,
}

#[derive(Serialize)]
struct FailureDetails {
    primary: String,
    secondary: String,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_secs: u64,
    providers: ProviderProbe,
}

#[derive(Serialize)]
struct ProviderProbe {
    primary: bool,
    secondary: bool,
}

// --- Handlers ---

/// The completion operation: Validator → Trimmer → Corpus Serializer →
/// Failover Orchestrator.
async fn chat_handler(State(state): State<SharedState>, body: Bytes) -> Response {
    let request_id = Uuid::new_v4();

    // An unreadable body is an unexpected failure, not a validation
    // outcome: answer with a generic error and keep the detail in the
    // server log only.
    let payload: ConversationRequest = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!(%request_id, error = %e, "Unreadable chat payload");
            return internal_error();
        }
    };

    let history = match payload.validate() {
        Ok(history) => history,
        Err(reason) => {
            warn!(%request_id, reason = %reason, "Rejected chat payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: reason.to_string(),
                }),
            )
                .into_response();
        }
    };

    let recent = trim_history(&history);
    let locale = payload.locale().unwrap_or(&state.default_locale);
    let system_prompt = build_system_prompt(&state.corpus, locale);

    info!(
        %request_id,
        turns = recent.len(),
        locale = %locale,
        "Dispatching conversation"
    );

    match state.orchestrator.complete(&system_prompt, recent).await {
        Ok(outcome) => {
            info!(%request_id, provider = %outcome.provider, "Reply delivered");
            (
                StatusCode::OK,
                Json(ChatReply {
                    reply: outcome.reply,
                    provider: outcome.provider,
                }),
            )
                .into_response()
        }
        Err(failure) => {
            error!(
                %request_id,
                primary = %failure.primary,
                secondary = %failure.secondary,
                "All providers failed"
            );
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(UnavailableBody {
                    error: "all providers failed".into(),
                    details: FailureDetails {
                        primary: failure.primary.to_string(),
                        secondary: failure.secondary.to_string(),
                    },
                }),
            )
                .into_response()
        }
    }
}

/// The capability probe: reports which provider credentials are
/// configured in this deployment. Makes no outbound calls.
async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0) as u64;

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: uptime,
        providers: ProviderProbe {
            primary: state.orchestrator.primary_configured(),
            secondary: state.orchestrator.secondary_configured(),
        },
    })
}

fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "internal server error".into(),
        }),
    )
        .into_response()
}
