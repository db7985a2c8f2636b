use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use qrcode_service::{
    QrCodeService, ServiceConfig, render::PngQrEncoder, router, storage::LocalFileStorage, store,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env()?;

    let record_store = match store::connect(&config.mongodb_uri, &config.database).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "record store unavailable");
            return Err(err.into());
        }
    };

    let images = LocalFileStorage::new(config.public_dir.clone(), config.image_base_url());
    tokio::fs::create_dir_all(images.base_dir())
        .await
        .with_context(|| format!("create image directory {}", images.base_dir().display()))?;

    let service = QrCodeService::new(record_store.clone(), Arc::new(PngQrEncoder), images);
    let app = router(service);

    let bind_address = config.bind_address();
    let tcp_listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("bind {bind_address}"))?;
    info!(
        address = %bind_address,
        public_dir = %config.public_dir.display(),
        public_url = %config.public_url,
        "qrcode service listening"
    );

    let served = axum::serve(tcp_listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await;

    record_store.close().await;
    served.context("http server failed")?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("LOG_FORMAT")
        .map(|value| value.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
