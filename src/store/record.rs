use chrono::{DateTime, Utc};
use mongodb::bson::{self, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// One QR generation, as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct QrCodeRecord {
    pub id: ObjectId,
    pub text: String,
    pub height: u32,
    pub width: u32,
    pub color_dark: String,
    pub color_light: String,
    pub bg_color: String,
    pub widget_size: u32,
    pub text_inside: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// Document shape in the `qrcodes` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub color_dark: String,
    #[serde(default)]
    pub color_light: String,
    #[serde(default)]
    pub bg_color: String,
    #[serde(default)]
    pub widget_size: u32,
    #[serde(default)]
    pub text_inside: String,
    #[serde(default)]
    pub filename: String,
    pub created_at: bson::DateTime,
}

impl From<&QrCodeRecord> for QrCodeDocument {
    fn from(record: &QrCodeRecord) -> Self {
        Self {
            id: record.id,
            text: record.text.clone(),
            height: record.height,
            width: record.width,
            color_dark: record.color_dark.clone(),
            color_light: record.color_light.clone(),
            bg_color: record.bg_color.clone(),
            widget_size: record.widget_size,
            text_inside: record.text_inside.clone(),
            filename: record.filename.clone(),
            created_at: bson::DateTime::from_millis(record.created_at.timestamp_millis()),
        }
    }
}

impl From<QrCodeDocument> for QrCodeRecord {
    fn from(doc: QrCodeDocument) -> Self {
        let created_at = DateTime::from_timestamp_millis(doc.created_at.timestamp_millis())
            .unwrap_or_default();
        Self {
            id: doc.id,
            text: doc.text,
            height: doc.height,
            width: doc.width,
            color_dark: doc.color_dark,
            color_light: doc.color_light,
            bg_color: doc.bg_color,
            widget_size: doc.widget_size,
            text_inside: doc.text_inside,
            filename: doc.filename,
            created_at,
        }
    }
}
