use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointList {
    pub ask: String,
    pub health: String,
    pub stats: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub service: String,
    pub endpoints: EndpointList,
}

/// Service name and the endpoints it offers
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Endpoint listing", body = ServiceInfo)
    ),
    tag = "meta"
)]
pub async fn index() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Member Data QA Service".to_string(),
        endpoints: EndpointList {
            ask: "/ask?question=YOUR_QUESTION".to_string(),
            health: "/health".to_string(),
            stats: "/stats".to_string(),
        },
    })
}
