use std::sync::Arc;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tracing::{debug, info};

use crate::{
    error::{QrResult, QrServiceError},
    models::{GenerateRequest, GenerateResponse, QrCodeSummary},
    render::QrEncoder,
    storage::LocalFileStorage,
    store::{QrCodeRecord, RecordStore},
};

/// Orchestrates encoder, image directory and record store for the HTTP layer.
#[derive(Clone)]
pub struct QrCodeService {
    store: Arc<dyn RecordStore>,
    encoder: Arc<dyn QrEncoder>,
    images: LocalFileStorage,
}

impl QrCodeService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        encoder: Arc<dyn QrEncoder>,
        images: LocalFileStorage,
    ) -> Self {
        Self {
            store,
            encoder,
            images,
        }
    }

    pub fn images(&self) -> &LocalFileStorage {
        &self.images
    }

    pub async fn create(&self, request: GenerateRequest) -> QrResult<GenerateResponse> {
        let options = request.validate().map_err(QrServiceError::validation)?;

        let id = ObjectId::new();
        let created_at = now_millis();
        let filename = build_filename(created_at);

        let png = self
            .encoder
            .encode_png(&options)
            .map_err(|err| QrServiceError::encoding(format!("{err:#}")))?;
        self.images
            .put(&filename, &png)
            .await
            .map_err(|err| QrServiceError::encoding(format!("write {filename}: {err:#}")))?;
        debug!(%filename, bytes = png.len(), "qr image written");

        let record = QrCodeRecord {
            id,
            text: options.text,
            height: options.height,
            width: options.width,
            color_dark: options.color_dark,
            color_light: options.color_light,
            bg_color: options.bg_color,
            widget_size: options.widget_size,
            text_inside: options.text_inside,
            filename,
            created_at,
        };
        self.store.insert(&record).await?;
        info!(id = %record.id, filename = %record.filename, "qr code generated");

        Ok(GenerateResponse::created(self.summarize(&record)))
    }

    pub async fn list(&self) -> QrResult<Vec<QrCodeSummary>> {
        let records = self.store.find_all().await?;
        if records.is_empty() {
            return Err(QrServiceError::not_found("No QR Codes found"));
        }
        Ok(records.iter().map(|record| self.summarize(record)).collect())
    }

    pub async fn get(&self, id: &str) -> QrResult<QrCodeSummary> {
        match self.store.find_by_id(id).await? {
            Some(record) => Ok(self.summarize(&record)),
            None => Err(QrServiceError::not_found("QR Code not found")),
        }
    }

    fn summarize(&self, record: &QrCodeRecord) -> QrCodeSummary {
        QrCodeSummary::from_record(record, self.images.get_public_url(&record.filename))
    }
}

/// Current time at the precision the document store keeps.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// `qrcode_<YYYYMMDDHHMMSS>.png` in UTC. Two creates in the same second share a name.
pub fn build_filename(created_at: DateTime<Utc>) -> String {
    format!("qrcode_{}.png", created_at.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::anyhow;
    use async_trait::async_trait;

    use super::*;
    use crate::{
        render::{PngQrEncoder, RenderOptions},
        store::{MemoryRecordStore, StoreError},
    };

    struct FailingEncoder;

    impl QrEncoder for FailingEncoder {
        fn encode_png(&self, _options: &RenderOptions) -> anyhow::Result<Vec<u8>> {
            Err(anyhow!("encoder offline"))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl RecordStore for BrokenStore {
        async fn insert(&self, _record: &QrCodeRecord) -> Result<(), StoreError> {
            Err(StoreError::Backend("write refused".into()))
        }

        async fn find_all(&self) -> Result<Vec<QrCodeRecord>, StoreError> {
            Err(StoreError::Backend("read refused".into()))
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<QrCodeRecord>, StoreError> {
            Err(StoreError::Backend("read refused".into()))
        }

        async fn close(&self) {}
    }

    fn images(dir: &tempfile::TempDir) -> LocalFileStorage {
        LocalFileStorage::new(
            dir.path().to_path_buf(),
            "http://localhost:3000/qrcodes".into(),
        )
    }

    #[test]
    fn filename_is_second_resolution_utc_timestamp() {
        let created_at = DateTime::from_timestamp_millis(1_704_110_400_987).unwrap();
        assert_eq!(build_filename(created_at), "qrcode_20240101120000.png");
    }

    #[tokio::test]
    async fn create_writes_image_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryRecordStore::new());
        let service = QrCodeService::new(store.clone(), Arc::new(PngQrEncoder), images(&dir));

        let response = service
            .create(GenerateRequest::with_text("hello"))
            .await
            .unwrap();

        assert!(response.success);
        assert!(service.images().resolve_path(&response.qrcode.filename).is_file());
        assert_eq!(store.len().await, 1);
        assert_eq!(
            response.qrcode.available_at,
            format!("http://localhost:3000/qrcodes/{}", response.qrcode.filename)
        );
        assert_eq!(response.qrcode.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[tokio::test]
    async fn repeated_creates_make_independent_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryRecordStore::new());
        let service = QrCodeService::new(store.clone(), Arc::new(PngQrEncoder), images(&dir));
        let first = service.create(GenerateRequest::with_text("a")).await.unwrap();
        let second = service.create(GenerateRequest::with_text("a")).await.unwrap();
        assert_ne!(first.qrcode.id, second.qrcode.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn encoder_failure_persists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryRecordStore::new());
        let service = QrCodeService::new(store.clone(), Arc::new(FailingEncoder), images(&dir));

        let err = service
            .create(GenerateRequest::with_text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, QrServiceError::Encoding(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unwritable_image_directory_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();
        let store = Arc::new(MemoryRecordStore::new());
        let service = QrCodeService::new(
            store.clone(),
            Arc::new(PngQrEncoder),
            LocalFileStorage::new(PathBuf::from(&blocker), "http://x/qrcodes".into()),
        );

        let err = service
            .create(GenerateRequest::with_text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, QrServiceError::Encoding(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn store_failures_surface_as_persistence_errors() {
        let dir = tempfile::tempdir().unwrap();
        let service = QrCodeService::new(Arc::new(BrokenStore), Arc::new(PngQrEncoder), images(&dir));

        let err = service
            .create(GenerateRequest::with_text("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, QrServiceError::Persistence(_)));
        assert!(matches!(
            service.list().await.unwrap_err(),
            QrServiceError::Persistence(_)
        ));
        assert!(matches!(
            service.get("65a1f0c2e4b0a1b2c3d4e5f6").await.unwrap_err(),
            QrServiceError::Persistence(_)
        ));
    }

    #[tokio::test]
    async fn invalid_color_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = QrCodeService::new(
            Arc::new(MemoryRecordStore::new()),
            Arc::new(PngQrEncoder),
            images(&dir),
        );
        let mut request = GenerateRequest::with_text("hello");
        request.color_dark = "blue".into();
        let err = service.create(request).await.unwrap_err();
        assert!(matches!(err, QrServiceError::Encoding(_)));
    }
}
