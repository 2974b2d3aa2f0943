//! HTTP handler for Objection Navigator
//!
//! `POST /generateAda` (also mounted at `/`) turns an objection into an ADA+C
//! rebuttal. Request checks run in a fixed order, each short-circuiting:
//!
//! 1. method: anything but `POST` → 405 (preflight is answered by [`cors`])
//! 2. body: missing or non-string `objection` → 400
//! 3. credential: completion API key not resolvable → 500
//!
//! Past those checks the endpoint always answers 200, with fallback content
//! if the completion service misbehaves.

pub mod cors;

pub use cors::{cors_middleware, CorsPolicy};

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use objection_secrets::{ProviderHealth, SecretProvider};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::client::{CompletionService, OpenAiCompletionClient};
use crate::config::ServiceConfig;
use crate::contracts::{ErrorBody, ObjectionRequest, RebuttalEnvelope, RequestError};
use crate::engine::{RebuttalEngine, RebuttalSource};
use crate::error::Result;
use crate::telemetry::{RebuttalMetrics, RequestOutcome};
use crate::{AGENT_ID, AGENT_VERSION};

/// Shared, read-only per-process state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub engine: Arc<RebuttalEngine>,
    pub credentials: Arc<dyn SecretProvider>,
    pub metrics: Arc<RebuttalMetrics>,
    pub cors: Arc<CorsPolicy>,
}

impl AppState {
    /// Assemble state around an arbitrary completion service and credential source
    pub fn new(
        config: ServiceConfig,
        completion: Arc<dyn CompletionService>,
        credentials: Arc<dyn SecretProvider>,
    ) -> Result<Self> {
        let cors = CorsPolicy::new(&config.allowed_origins, config.cors_max_age_secs);

        Ok(Self {
            engine: Arc::new(RebuttalEngine::new(completion)),
            credentials,
            metrics: Arc::new(RebuttalMetrics::new()?),
            cors: Arc::new(cors),
            config: Arc::new(config),
        })
    }

    /// Production wiring: OpenAI client plus the configured credential chain
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        config.validate()?;

        let completion = OpenAiCompletionClient::new(config.completion.clone())?;
        let credentials = config.credential_chain();

        tracing::info!(
            endpoint = completion.endpoint(),
            model = %completion.settings().model,
            credential_sources = ?credentials.provider_names(),
            "Rebuttal service configured"
        );

        Self::new(config, Arc::new(completion), Arc::new(credentials))
    }
}

/// Client-visible failures of the rebuttal endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiError {
    MethodNotAllowed,
    MissingObjection,
    Misconfigured,
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingObjection => StatusCode::BAD_REQUEST,
            ApiError::Misconfigured | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::MethodNotAllowed => "Method not allowed",
            ApiError::MissingObjection => "Field 'objection' is required",
            ApiError::Misconfigured => "Server misconfiguration",
            ApiError::Internal => "Internal server error",
        }
    }

    pub fn outcome(&self) -> RequestOutcome {
        match self {
            ApiError::MethodNotAllowed => RequestOutcome::MethodNotAllowed,
            ApiError::MissingObjection => RequestOutcome::Invalid,
            ApiError::Misconfigured => RequestOutcome::Misconfigured,
            ApiError::Internal => RequestOutcome::InternalError,
        }
    }
}

impl From<RequestError> for ApiError {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::MissingObjection => ApiError::MissingObjection,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::new(self.message()))).into_response()
    }
}

/// Routes and body limit; the outer guard layers live in [`crate::server`]
pub fn create_router(state: AppState) -> Router {
    let rebuttal = post(generate_rebuttal).fallback(method_not_allowed);
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/", rebuttal.clone())
        .route("/generateAda", rebuttal)
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Produce an ADA+C rebuttal for one objection
pub async fn generate_rebuttal(
    State(state): State<AppState>,
    body: Bytes,
) -> std::result::Result<Json<RebuttalEnvelope>, ApiError> {
    let request_id = Uuid::new_v4();
    let request = ObjectionRequest::from_slice(&body).map_err(|e| {
        tracing::debug!(%request_id, error = %e, body_bytes = body.len(), "Rejected rebuttal request");
        reject(&state, ApiError::from(e))
    })?;

    let secret_name = &state.config.api_key_secret;
    let api_key = match state.credentials.get(secret_name).await {
        Ok(secret) => secret,
        Err(e) => {
            tracing::error!(%request_id, error = %e, "Missing {}", secret_name);
            return Err(reject(&state, ApiError::Misconfigured));
        }
    };

    let rebuttal = state.engine.generate(&request, api_key.expose()).await;

    state
        .metrics
        .observe_completion(rebuttal.completion_time.as_secs_f64());
    match rebuttal.source {
        RebuttalSource::Fallback { reason } => {
            state.metrics.record_completion_failure(reason);
            state.metrics.record_request(RequestOutcome::Fallback);
        }
        RebuttalSource::Completion | RebuttalSource::Offline => {
            state.metrics.record_request(RequestOutcome::Success);
        }
    }

    tracing::info!(
        %request_id,
        category = %rebuttal.result.category,
        fallback = rebuttal.source.is_fallback(),
        credential_source = api_key.source(),
        completion_ms = rebuttal.completion_time.as_millis() as u64,
        "Rebuttal generated"
    );

    Ok(Json(RebuttalEnvelope {
        result: rebuttal.result,
    }))
}

/// Any method other than POST (and the preflight OPTIONS) on the rebuttal routes
pub async fn method_not_allowed(State(state): State<AppState>) -> ApiError {
    reject(&state, ApiError::MethodNotAllowed)
}

fn reject(state: &AppState, err: ApiError) -> ApiError {
    state.metrics.record_request(err.outcome());
    err
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub agent_id: String,
    pub agent_version: String,
    pub timestamp: String,
    pub credentials: ProviderHealth,
}

/// Health check endpoint
///
/// Degraded when the completion API key cannot be resolved, since every
/// rebuttal request would then fail with 500.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let credentials = credential_health(&state).await;
    let status = if credentials.healthy { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status: status.to_string(),
        agent_id: AGENT_ID.to_string(),
        agent_version: AGENT_VERSION.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        credentials,
    })
}

async fn credential_health(state: &AppState) -> ProviderHealth {
    let provider = state.credentials.name();
    let secret_name = &state.config.api_key_secret;

    let base = state.credentials.health_check();
    if !base.healthy {
        return base;
    }

    match state.credentials.exists(secret_name).await {
        Ok(true) => base,
        Ok(false) => ProviderHealth::unhealthy(provider, format!("{} is not set", secret_name)),
        Err(e) => ProviderHealth::unhealthy(
            provider,
            format!("{} could not be resolved: {}", secret_name, e),
        ),
    }
}

/// Prometheus text exposition
pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render metrics");
            ApiError::Internal.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(ApiError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(ApiError::MissingObjection.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Misconfigured.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::Internal.message(), "Internal server error");
        assert_eq!(
            ApiError::from(RequestError::MissingObjection).message(),
            RequestError::MissingObjection.to_string()
        );
    }

    #[test]
    fn test_error_outcomes() {
        assert_eq!(ApiError::MissingObjection.outcome(), RequestOutcome::Invalid);
        assert_eq!(ApiError::Misconfigured.outcome(), RequestOutcome::Misconfigured);
    }
}
