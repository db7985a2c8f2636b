pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod render;
pub mod service;
pub mod storage;
pub mod store;

pub use app::router;
pub use config::ServiceConfig;
pub use error::{QrResult, QrServiceError};
pub use service::QrCodeService;
