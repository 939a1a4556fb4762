//! Ticket endpoints:
//! - POST /gerar_ingresso - issue a ticket and return its QR image
//! - POST /validar_ingresso - check a (cpf, uuidQr) pair
//! - GET /ingressos/:cpf - list every ticket held by a CPF

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::TicketSummary;
use crate::services::{InvalidReason, NewTicket, TicketLookup, ValidationResult};
use crate::state::AppState;
use crate::utils::error::AppError;

const STATUS_VALID: &str = "válido";
const STATUS_INVALID: &str = "inválido";

/// Every field is optional on the wire so that absence is reported as a
/// missing field rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct IssueTicketRequest {
    pub nome: Option<String>,
    pub evento: Option<String>,
    pub data: Option<String>,
    pub hora: Option<String>,
    pub local: Option<String>,
    pub cpf: Option<String>,
}

impl From<IssueTicketRequest> for NewTicket {
    fn from(request: IssueTicketRequest) -> Self {
        Self {
            name: request.nome.unwrap_or_default(),
            event: request.evento.unwrap_or_default(),
            date: request.data.unwrap_or_default(),
            time: request.hora.unwrap_or_default(),
            venue: request.local.unwrap_or_default(),
            identity_key: request.cpf.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTicketResponse {
    pub qr_code_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateTicketRequest {
    pub cpf: Option<String>,
    pub uuid_qr: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    fn valid(image: String) -> Self {
        Self {
            status: STATUS_VALID,
            qr_code_data: Some(image),
            message: None,
        }
    }

    fn invalid(reason: InvalidReason) -> Self {
        let message = match reason {
            InvalidReason::NotFound => "Ingresso não encontrado.",
        };

        Self {
            status: STATUS_INVALID,
            qr_code_data: None,
            message: Some(message.to_string()),
        }
    }
}

pub async fn issue_ticket(
    State(state): State<AppState>,
    payload: Result<Json<IssueTicketRequest>, JsonRejection>,
) -> Result<Json<IssueTicketResponse>, AppError> {
    let Json(request) = payload?;

    let qr_code_url = state.tickets.issue(request.into()).await?;

    Ok(Json(IssueTicketResponse { qr_code_url }))
}

pub async fn validate_ticket(
    State(state): State<AppState>,
    payload: Result<Json<ValidateTicketRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;
    let cpf = required(request.cpf, "cpf")?;
    let uuid_qr = required(request.uuid_qr, "uuidQr")?;

    // An identifier that is not a UUID cannot match any stored ticket.
    let result = match Uuid::parse_str(uuid_qr.trim()) {
        Ok(ticket_id) => state.tickets.validate(&cpf, ticket_id).await?,
        Err(_) => ValidationResult::Invalid {
            reason: InvalidReason::NotFound,
        },
    };

    let response = match result {
        ValidationResult::Valid { image } => {
            (StatusCode::OK, Json(ValidationResponse::valid(image))).into_response()
        }
        ValidationResult::Invalid { reason } => (
            StatusCode::BAD_REQUEST,
            Json(ValidationResponse::invalid(reason)),
        )
            .into_response(),
    };

    Ok(response)
}

pub async fn list_tickets(
    State(state): State<AppState>,
    Path(cpf): Path<String>,
) -> Result<Json<Vec<TicketSummary>>, AppError> {
    match state.tickets.lookup_by_identity(&cpf).await? {
        TicketLookup::Found(summaries) => Ok(Json(summaries)),
        TicketLookup::NoTicketsFound => Err(AppError::NotFound(
            "No tickets found for this CPF".to_string(),
        )),
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::ValidationError(format!(
            "missing required field '{field}'"
        ))),
    }
}
