use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{QrCodeRecord, RecordStore, StoreError, parse_record_id};

/// In-process store keeping records in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: RwLock<Vec<QrCodeRecord>>,
}

impl MemoryRecordStore {
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
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: &QrCodeRecord) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::Backend(format!("duplicate key: {}", record.id)));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<QrCodeRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<QrCodeRecord>, StoreError> {
        let Some(id) = parse_record_id(id) else {
            return Ok(None);
        };
        let records = self.records.read().await;
        Ok(records.iter().find(|record| record.id == id).cloned())
    }

    async fn close(&self) {}
}
