use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::TicketRecord;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryTicketStore;
pub use postgres::PgTicketStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique column (`ticket_id` or `payload_text`) already holds the value.
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("database error")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::ConstraintViolation(db.constraint().unwrap_or("unique").to_string())
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Durable storage of issued tickets.
///
/// Uniqueness of `ticket_id` and `payload_text` is the store's job; callers
/// treat a [`StoreError::ConstraintViolation`] as final.
#[async_trait]
pub trait TicketStore: Send + Sync {
    async fn insert(&self, record: &TicketRecord) -> Result<(), StoreError>;

    async fn find_one(
        &self,
        identity_key: &str,
        ticket_id: Uuid,
    ) -> Result<Option<TicketRecord>, StoreError>;

    async fn find_all(&self, identity_key: &str) -> Result<Vec<TicketRecord>, StoreError>;
}
