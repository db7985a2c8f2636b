use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use tracing::{debug, warn};

use crate::{
    error::{QrResult, QrServiceError},
    models::{GenerateRequest, GenerateResponse, QrCodeSummary},
    service::QrCodeService,
};

pub async fn generate_qrcode(
    State(service): State<QrCodeService>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> QrResult<Json<GenerateResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "rejected generate request body");
        QrServiceError::validation(rejection.body_text())
    })?;
    let response = service.create(request).await?;
    Ok(Json(response))
}

pub async fn list_qrcodes(
    State(service): State<QrCodeService>,
) -> QrResult<Json<Vec<QrCodeSummary>>> {
    Ok(Json(service.list().await?))
}

pub async fn get_qrcode(
    State(service): State<QrCodeService>,
    id: Result<Path<String>, PathRejection>,
) -> QrResult<Json<QrCodeSummary>> {
    let Path(id) = id.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "undecodable qr code id");
        QrServiceError::not_found("QR Code not found")
    })?;
    Ok(Json(service.get(&id).await?))
}
