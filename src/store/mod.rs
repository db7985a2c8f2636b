pub mod memory;
pub mod mongo;
pub mod record;

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

pub use memory::MemoryRecordStore;
pub use mongo::MongoRecordStore;
pub use record::QrCodeRecord;

const MEMORY_SCHEME: &str = "memory://";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record store connection failed: {0}")]
    Connection(String),

    #[error("record store operation failed: {0}")]
    Backend(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Persistence for generation records. Records are insert-only.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, record: &QrCodeRecord) -> Result<(), StoreError>;

    /// Every record, in the store's natural order.
    async fn find_all(&self) -> Result<Vec<QrCodeRecord>, StoreError>;

    /// `Ok(None)` for unknown and for malformed identifiers alike.
    async fn find_by_id(&self, id: &str) -> Result<Option<QrCodeRecord>, StoreError>;

    async fn close(&self);
}

pub fn parse_record_id(raw: &str) -> Option<ObjectId> {
    ObjectId::parse_str(raw.trim()).ok()
}

/// Opens the store named by `uri`; `memory://` selects the in-process store.
pub async fn connect(uri: &str, database: &str) -> Result<Arc<dyn RecordStore>, StoreError> {
    if uri.trim().starts_with(MEMORY_SCHEME) {
        return Ok(Arc::new(MemoryRecordStore::new()));
    }
    let store = MongoRecordStore::connect(uri, database).await?;
    Ok(Arc::new(store))
}
