use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, TicketStore};
use crate::models::TicketRecord;

/// Process-local store with the same uniqueness rules as the `tickets` table.
#[derive(Default)]
pub struct InMemoryTicketStore {
    records: RwLock<Vec<TicketRecord>>,
}

impl InMemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn insert(&self, record: &TicketRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;

        if records.iter().any(|r| r.ticket_id == record.ticket_id) {
            return Err(StoreError::ConstraintViolation("tickets_pkey".to_string()));
        }
        if records.iter().any(|r| r.payload_text == record.payload_text) {
            return Err(StoreError::ConstraintViolation(
                "tickets_payload_text_key".to_string(),
            ));
        }

        records.push(record.clone());
        Ok(())
    }

    async fn find_one(
        &self,
        identity_key: &str,
        ticket_id: Uuid,
    ) -> Result<Option<TicketRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| r.identity_key == identity_key && r.ticket_id == ticket_id)
            .cloned())
    }

    async fn find_all(&self, identity_key: &str) -> Result<Vec<TicketRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.identity_key == identity_key)
            .cloned()
            .collect())
    }
}
