use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod docs;
pub mod tickets;

pub use docs::openapi_document;
pub use tickets::{issue_ticket, list_tickets, validate_ticket};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "ingressos-api",
    };

    success(payload, "Health check successful")
}
