use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::doc,
};
use tracing::info;

use super::{QrCodeRecord, RecordStore, StoreError, parse_record_id, record::QrCodeDocument};

const COLLECTION: &str = "qrcodes";

pub struct MongoRecordStore {
    client: Client,
    collection: Collection<QrCodeDocument>,
}

impl MongoRecordStore {
    /// Connects and pings the deployment so an unreachable store fails at startup.
    pub async fn connect(uri: &str, default_database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(default_database));
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| StoreError::Connection(err.to_string()))?;
        info!(database = database.name(), collection = COLLECTION, "connected to MongoDB");
        let collection = database.collection::<QrCodeDocument>(COLLECTION);
        Ok(Self { client, collection })
    }
}

#[async_trait]
impl RecordStore for MongoRecordStore {
    async fn insert(&self, record: &QrCodeRecord) -> Result<(), StoreError> {
        self.collection
            .insert_one(QrCodeDocument::from(record))
            .await?;
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<QrCodeRecord>, StoreError> {
        let cursor = self.collection.find(doc! {}).await?;
        let docs: Vec<QrCodeDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(QrCodeRecord::from).collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<QrCodeRecord>, StoreError> {
        let Some(id) = parse_record_id(id) else {
            return Ok(None);
        };
        let found = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(found.map(QrCodeRecord::from))
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}
