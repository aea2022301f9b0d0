use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatsResponse {
    pub total_messages: usize,
    pub unique_users: usize,
    /// Message count per author display name
    pub users: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum StatsPayload {
    Stats(StatsResponse),
    Error { error: String },
}

/// Message totals per author
///
/// When every page failed and nothing was collected, the payload carries an
/// `error` field instead of counts.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, description = "Message statistics or fetch error", body = StatsPayload)
    ),
    tag = "stats"
)]
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsPayload> {
    let summary = state.fetcher.fetch_all_with_summary().await;

    if summary.messages.is_empty() && summary.aborted {
        return Json(StatsPayload::Error {
            error: format!(
                "Failed to fetch messages: {} consecutive page failures",
                summary.skipped_offsets.len()
            ),
        });
    }

    let mut users: BTreeMap<String, usize> = BTreeMap::new();
    for msg in &summary.messages {
        *users.entry(msg.user_name.clone()).or_default() += 1;
    }

    Json(StatsPayload::Stats(StatsResponse {
        total_messages: summary.messages.len(),
        unique_users: users.len(),
        users,
    }))
}
