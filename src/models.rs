use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{render::RenderOptions, store::QrCodeRecord};

pub const DEFAULT_DIMENSION: u32 = 300;
pub const DEFAULT_COLOR_DARK: &str = "#000000";
pub const DEFAULT_COLOR_LIGHT: &str = "#ffffff";
pub const DEFAULT_BG_COLOR: &str = "#ffffff";
pub const DEFAULT_WIDGET_SIZE: u32 = 4;

pub const MAX_DIMENSION: u32 = 4096;
pub const MAX_WIDGET_SIZE: u32 = 64;

/// Body of `POST /generate`. Every field but `text` has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_dimension")]
    pub height: u32,
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_color_dark")]
    pub color_dark: String,
    #[serde(default = "default_color_light")]
    pub color_light: String,
    #[serde(default = "default_bg_color")]
    pub bg_color: String,
    #[serde(default = "default_widget_size")]
    pub widget_size: u32,
    #[serde(default)]
    pub text_inside: String,
}

fn default_dimension() -> u32 {
    DEFAULT_DIMENSION
}

fn default_color_dark() -> String {
    DEFAULT_COLOR_DARK.to_string()
}

fn default_color_light() -> String {
    DEFAULT_COLOR_LIGHT.to_string()
}

fn default_bg_color() -> String {
    DEFAULT_BG_COLOR.to_string()
}

fn default_widget_size() -> u32 {
    DEFAULT_WIDGET_SIZE
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            text: None,
            height: DEFAULT_DIMENSION,
            width: DEFAULT_DIMENSION,
            color_dark: default_color_dark(),
            color_light: default_color_light(),
            bg_color: default_bg_color(),
            widget_size: DEFAULT_WIDGET_SIZE,
            text_inside: String::new(),
        }
    }
}

impl GenerateRequest {
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Checks presence and ranges, yielding the effective rendering parameters.
    pub fn validate(self) -> Result<RenderOptions, String> {
        let text = match self.text {
            Some(text) if !text.is_empty() => text,
            _ => return Err("Text is required".to_string()),
        };
        for (field, value) in [("height", self.height), ("width", self.width)] {
            if !(1..=MAX_DIMENSION).contains(&value) {
                return Err(format!("{field} must be between 1 and {MAX_DIMENSION}"));
            }
        }
        if !(1..=MAX_WIDGET_SIZE).contains(&self.widget_size) {
            return Err(format!("widgetSize must be between 1 and {MAX_WIDGET_SIZE}"));
        }
        Ok(RenderOptions {
            text,
            width: self.width,
            height: self.height,
            color_dark: self.color_dark,
            color_light: self.color_light,
            bg_color: self.bg_color,
            widget_size: self.widget_size,
            text_inside: self.text_inside,
        })
    }
}

/// Projection of a record returned by every read endpoint; never carries `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeSummary {
    pub id: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
    pub available_at: String,
    pub text_inside: String,
    pub height: u32,
    pub width: u32,
    pub color_dark: String,
    pub color_light: String,
    pub bg_color: String,
    pub widget_size: u32,
}

impl QrCodeSummary {
    pub fn from_record(record: &QrCodeRecord, available_at: String) -> Self {
        Self {
            id: record.id.to_hex(),
            filename: record.filename.clone(),
            created_at: record.created_at,
            available_at,
            text_inside: record.text_inside.clone(),
            height: record.height,
            width: record.width,
            color_dark: record.color_dark.clone(),
            color_light: record.color_light.clone(),
            bg_color: record.bg_color.clone(),
            widget_size: record.widget_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub qrcode: QrCodeSummary,
}

impl GenerateResponse {
    pub fn created(qrcode: QrCodeSummary) -> Self {
        Self {
            success: true,
            message: "QR Code generated and saved successfully".to_string(),
            qrcode,
        }
    }
}
