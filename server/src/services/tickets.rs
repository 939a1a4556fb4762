use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::qr::{EncodingError, QrEncoder};
use crate::models::{TicketDetails, TicketRecord, TicketSummary};
use crate::store::{StoreError, TicketStore};

/// Issuance input. Field names in errors use the request's wire names.
#[derive(Debug, Clone, Default)]
pub struct NewTicket {
    pub name: String,
    pub event: String,
    pub date: String,
    pub time: String,
    pub venue: String,
    pub identity_key: String,
}

/// JSON carried inside the QR symbol.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QrPayload<'a> {
    cpf: &'a str,
    ticket_id: Uuid,
}

#[derive(Debug, Error)]
pub enum IssuanceError {
    #[error("missing required field '{0}'")]
    MissingField(&'static str),

    #[error("field '{0}' must not contain line breaks")]
    InvalidField(&'static str),

    #[error(transparent)]
    Encoding(#[from] EncodingError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to serialize QR payload")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("ticket {ticket_id} has a malformed payload")]
    MalformedRecord { ticket_id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid { image: String },
    Invalid { reason: InvalidReason },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketLookup {
    Found(Vec<TicketSummary>),
    NoTicketsFound,
}

pub struct TicketService {
    store: Arc<dyn TicketStore>,
    encoder: Arc<dyn QrEncoder>,
}

impl TicketService {
    pub fn new(store: Arc<dyn TicketStore>, encoder: Arc<dyn QrEncoder>) -> Self {
        Self { store, encoder }
    }

    /// Issues a ticket and returns its image data URI.
    ///
    /// The record is only inserted once the image has been rendered, so a
    /// failed encode leaves nothing behind.
    pub async fn issue(&self, ticket: NewTicket) -> Result<String, IssuanceError> {
        let details = ticket.validate()?;
        let identity_key = ticket.identity_key;

        let ticket_id = Uuid::new_v4();
        let payload_text = details.to_payload_text();
        let qr_payload = serde_json::to_string(&QrPayload {
            cpf: &identity_key,
            ticket_id,
        })?;

        let encoded_image = self.encoder.encode(&qr_payload).await?;

        let record = TicketRecord {
            identity_key,
            ticket_id,
            payload_text,
            encoded_image,
            issued_at: Utc::now(),
        };
        self.store.insert(&record).await?;

        tracing::info!(%ticket_id, event = %details.event, "Ticket issued");
        Ok(record.encoded_image)
    }

    pub async fn validate(
        &self,
        identity_key: &str,
        ticket_id: Uuid,
    ) -> Result<ValidationResult, StoreError> {
        let result = match self.store.find_one(identity_key, ticket_id).await? {
            Some(record) => ValidationResult::Valid {
                image: record.encoded_image,
            },
            None => ValidationResult::Invalid {
                reason: InvalidReason::NotFound,
            },
        };

        tracing::debug!(
            %ticket_id,
            valid = matches!(result, ValidationResult::Valid { .. }),
            "Ticket validated"
        );
        Ok(result)
    }

    pub async fn lookup_by_identity(
        &self,
        identity_key: &str,
    ) -> Result<TicketLookup, LookupError> {
        let records = self.store.find_all(identity_key).await?;
        if records.is_empty() {
            return Ok(TicketLookup::NoTicketsFound);
        }

        let summaries = records
            .iter()
            .map(|record| {
                TicketSummary::try_from(record).map_err(|err| {
                    tracing::error!(
                        ticket_id = %record.ticket_id,
                        error = %err,
                        "Stored payload text does not parse"
                    );
                    LookupError::MalformedRecord {
                        ticket_id: record.ticket_id,
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TicketLookup::Found(summaries))
    }
}

impl NewTicket {
    /// Checks presence of every field and returns the descriptive part.
    fn validate(&self) -> Result<TicketDetails, IssuanceError> {
        let descriptive = [
            ("nome", &self.name),
            ("evento", &self.event),
            ("data", &self.date),
            ("hora", &self.time),
            ("local", &self.venue),
        ];

        for (field, value) in descriptive.iter().copied().chain([("cpf", &self.identity_key)]) {
            if value.trim().is_empty() {
                return Err(IssuanceError::MissingField(field));
            }
        }

        for (field, value) in descriptive {
            if value.contains(|c: char| c == '\n' || c == '\r') {
                return Err(IssuanceError::InvalidField(field));
            }
        }

        Ok(TicketDetails {
            name: self.name.clone(),
            event: self.event.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            venue: self.venue.clone(),
        })
    }
}
