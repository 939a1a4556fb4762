use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, TicketStore};
use crate::models::TicketRecord;

const SELECT_COLUMNS: &str =
    "SELECT identity_key, ticket_id, payload_text, encoded_image, issued_at FROM tickets";

#[derive(Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn insert(&self, record: &TicketRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tickets (ticket_id, identity_key, payload_text, encoded_image, issued_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(record.ticket_id)
        .bind(&record.identity_key)
        .bind(&record.payload_text)
        .bind(&record.encoded_image)
        .bind(record.issued_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(ticket_id = %record.ticket_id, "Ticket row inserted");
        Ok(())
    }

    async fn find_one(
        &self,
        identity_key: &str,
        ticket_id: Uuid,
    ) -> Result<Option<TicketRecord>, StoreError> {
        let record = sqlx::query_as::<_, TicketRecord>(&format!(
            "{SELECT_COLUMNS} WHERE identity_key = $1 AND ticket_id = $2"
        ))
        .bind(identity_key)
        .bind(ticket_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn find_all(&self, identity_key: &str) -> Result<Vec<TicketRecord>, StoreError> {
        let records = sqlx::query_as::<_, TicketRecord>(&format!(
            "{SELECT_COLUMNS} WHERE identity_key = $1 ORDER BY issued_at"
        ))
        .bind(identity_key)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
