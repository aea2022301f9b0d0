use axum::Json;
use utoipa::OpenApi;

use crate::routes::{ask, health, root, stats};

#[derive(OpenApi)]
#[openapi(
    paths(
        root::index,
        health::health_check,
        stats::stats,
        ask::ask_get,
        ask::ask_post,
    ),
    components(schemas(
        root::ServiceInfo,
        root::EndpointList,
        health::HealthResponse,
        stats::StatsResponse,
        stats::StatsPayload,
        ask::AskRequest,
        ask::AnswerResponse,
    )),
    tags(
        (name = "ask", description = "Question answering over member messages"),
        (name = "health", description = "Provider configuration"),
        (name = "stats", description = "Dataset statistics"),
        (name = "meta", description = "Service listing"),
    ),
    info(title = "Member Data QA Service", description = "Answer questions about member data from messages")
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
