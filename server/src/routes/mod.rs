use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, SecurityHeaders};
use crate::handlers::{health_check, issue_ticket, list_tickets, openapi_document, validate_ticket};
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_document))
        .route("/gerar_ingresso", post(issue_ticket))
        .route("/validar_ingresso", post(validate_ticket))
        .route("/ingressos/:cpf", get(list_tickets))
        .with_state(state);

    SecurityHeaders::from_env()
        .apply(router)
        .layer(create_cors_layer())
        .layer(TraceLayer::new_for_http())
}
