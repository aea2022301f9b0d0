use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

pub const NO_MESSAGES_ANSWER: &str = "No messages found in the data source.";

#[derive(Debug, Deserialize)]
pub struct AskQuery {
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Answer a natural-language question about member data
#[utoipa::path(
    get,
    path = "/ask",
    params(
        ("question" = String, Query, description = "The question to answer")
    ),
    responses(
        (status = 200, description = "Answer text", body = AnswerResponse),
        (status = 400, description = "Missing or blank question"),
        (status = 500, description = "Unexpected processing failure")
    ),
    tag = "ask"
)]
pub async fn ask_get(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AskQuery>,
) -> ApiResult<Json<AnswerResponse>> {
    answer_question(state, query.question.unwrap_or_default()).await
}

/// Answer a natural-language question about member data (JSON body)
#[utoipa::path(
    post,
    path = "/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Answer text", body = AnswerResponse),
        (status = 400, description = "Blank question or malformed body"),
        (status = 500, description = "Unexpected processing failure")
    ),
    tag = "ask"
)]
pub async fn ask_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> ApiResult<Json<AnswerResponse>> {
    let Json(req) = payload?;
    answer_question(state, req.question).await
}

async fn answer_question(state: Arc<AppState>, question: String) -> ApiResult<Json<AnswerResponse>> {
    if question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question parameter is required".to_string()));
    }

    // Run the pipeline on its own task so a panic surfaces as a 500
    // instead of tearing down the connection.
    let answer = tokio::spawn(async move {
        let messages = state.fetcher.fetch_all().await;
        if messages.is_empty() {
            return NO_MESSAGES_ANSWER.to_string();
        }

        state.answerer.answer(&question, &messages).await
    })
    .await
    .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(Json(AnswerResponse { answer }))
}
