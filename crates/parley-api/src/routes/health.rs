use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use parley_llm::ProviderType;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Provider tried first, or "none" when answers come from keyword search
    pub llm_provider: String,
    pub groq_configured: bool,
    pub claude_configured: bool,
    pub openai_configured: bool,
}

/// Health check endpoint
///
/// Reports which providers were configured at startup
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let chain = state.answerer.chain();

    Json(HealthResponse {
        status: "healthy".to_string(),
        llm_provider: chain
            .active()
            .map(|provider| provider.id().to_string())
            .unwrap_or_else(|| "none".to_string()),
        groq_configured: chain.is_configured(ProviderType::Groq),
        claude_configured: chain.is_configured(ProviderType::Anthropic),
        openai_configured: chain.is_configured(ProviderType::OpenAI),
    })
}
