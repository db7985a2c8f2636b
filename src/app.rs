use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{handlers, service::QrCodeService};

/// Path prefix generated images are served under.
pub const IMAGE_ROUTE_PREFIX: &str = "/qrcodes";

pub fn router(service: QrCodeService) -> Router {
    let image_dir = service.images().base_dir().to_path_buf();
    Router::new()
        .route("/generate", post(handlers::generate_qrcode))
        .route("/qrcodes/all", get(handlers::list_qrcodes))
        .route("/qrcodes/byId/{id}", get(handlers::get_qrcode))
        .nest_service(IMAGE_ROUTE_PREFIX, ServeDir::new(image_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
