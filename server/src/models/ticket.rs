use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Labels of the `payload_text` lines, in the order they are written.
pub const PAYLOAD_LABELS: [&str; 5] = ["Nome", "Evento", "Data", "Hora", "Local"];

const LABEL_SEPARATOR: &str = ": ";

/// A persisted ticket. Created once at issuance and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TicketRecord {
    pub identity_key: String,
    pub ticket_id: Uuid,
    pub payload_text: String,
    /// PNG data URI of the `{cpf, ticketId}` JSON, not of `payload_text`.
    pub encoded_image: String,
    pub issued_at: DateTime<Utc>,
}

/// The descriptive half of a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDetails {
    pub name: String,
    pub event: String,
    pub date: String,
    pub time: String,
    pub venue: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadParseError {
    #[error("expected {} lines, found {0}", PAYLOAD_LABELS.len())]
    LineCount(usize),

    #[error("line {line} has no label separator")]
    MissingSeparator { line: usize },

    #[error("line {line} is labelled '{found}', expected '{expected}'")]
    UnexpectedLabel {
        line: usize,
        expected: &'static str,
        found: String,
    },
}

impl TicketDetails {
    fn values(&self) -> [&str; 5] {
        [
            &self.name,
            &self.event,
            &self.date,
            &self.time,
            &self.venue,
        ]
    }

    /// Renders the `Label: value` lines stored as `payload_text`.
    pub fn to_payload_text(&self) -> String {
        PAYLOAD_LABELS
            .iter()
            .zip(self.values())
            .map(|(label, value)| format!("{label}{LABEL_SEPARATOR}{value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Inverse of [`TicketDetails::to_payload_text`]. Each line is split on its
    /// first `": "`, so values may themselves contain the separator.
    pub fn parse_payload_text(text: &str) -> Result<Self, PayloadParseError> {
        let lines: Vec<&str> = text.split('\n').collect();
        if lines.len() != PAYLOAD_LABELS.len() {
            return Err(PayloadParseError::LineCount(lines.len()));
        }

        let mut values = Vec::with_capacity(PAYLOAD_LABELS.len());
        for (index, (line, expected)) in lines.iter().zip(PAYLOAD_LABELS).enumerate() {
            let line_number = index + 1;
            let (label, value) = line
                .split_once(LABEL_SEPARATOR)
                .ok_or(PayloadParseError::MissingSeparator { line: line_number })?;

            if label != expected {
                return Err(PayloadParseError::UnexpectedLabel {
                    line: line_number,
                    expected,
                    found: label.to_string(),
                });
            }
            values.push(value.to_string());
        }

        let mut values = values.into_iter();
        let mut next = || values.next().unwrap_or_default();
        Ok(Self {
            name: next(),
            event: next(),
            date: next(),
            time: next(),
            venue: next(),
        })
    }
}

/// Lookup view of a ticket, serialized with the labels used in `payload_text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSummary {
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Evento")]
    pub event: String,
    #[serde(rename = "Data")]
    pub date: String,
    #[serde(rename = "Hora")]
    pub time: String,
    #[serde(rename = "Local")]
    pub venue: String,
    pub image: String,
}

impl TicketSummary {
    pub fn new(details: TicketDetails, image: String) -> Self {
        Self {
            name: details.name,
            event: details.event,
            date: details.date,
            time: details.time,
            venue: details.venue,
            image,
        }
    }
}

impl TryFrom<&TicketRecord> for TicketSummary {
    type Error = PayloadParseError;

    fn try_from(record: &TicketRecord) -> Result<Self, Self::Error> {
        let details = TicketDetails::parse_payload_text(&record.payload_text)?;
        Ok(Self::new(details, record.encoded_image.clone()))
    }
}
