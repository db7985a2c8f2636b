//! Service configuration read from the environment.

use std::env;
use std::path::PathBuf;

use anyhow::{Result, anyhow};

use crate::app::IMAGE_ROUTE_PREFIX;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";
pub const DEFAULT_DATABASE: &str = "qrcode";
pub const DEFAULT_PUBLIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub port: u16,
    pub bind_host: String,
    /// Document-store connection string; `memory://` selects the in-process store.
    pub mongodb_uri: String,
    pub database: String,
    pub public_dir: PathBuf,
    /// Origin the service is reachable at, e.g. `http://localhost:3000`.
    pub public_url: String,
}

impl ServiceConfig {
    /// Reads `PORT`, `BIND_HOST`, `MONGODB_URI` (required), `MONGODB_DATABASE`,
    /// `PUBLIC_DIR` and `PUBLIC_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = non_empty("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let bind_host = non_empty("BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());
        let mongodb_uri = non_empty("MONGODB_URI")
            .ok_or_else(|| anyhow!("MONGODB_URI must be set"))?;
        let database =
            non_empty("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let public_dir = non_empty("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR));
        let public_url = normalize_base_url(
            &non_empty("PUBLIC_URL").unwrap_or_else(|| format!("localhost:{port}")),
        );

        Ok(Self {
            port,
            bind_host,
            mongodb_uri,
            database,
            public_dir,
            public_url,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    /// URL prefix under which generated images are reachable.
    pub fn image_base_url(&self) -> String {
        format!("{}{IMAGE_ROUTE_PREFIX}", self.public_url)
    }
}

/// Adds a missing scheme, collapses doubled schemes and drops trailing slashes.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut base = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", trimmed.trim_end_matches('/'))
    };
    loop {
        let collapsed = if let Some(rest) = base.strip_prefix("http://http://") {
            format!("http://{rest}")
        } else if let Some(rest) = base.strip_prefix("https://https://") {
            format!("https://{rest}")
        } else if let Some(rest) = base.strip_prefix("http://https://") {
            format!("https://{rest}")
        } else if let Some(rest) = base.strip_prefix("https://http://") {
            format!("http://{rest}")
        } else {
            return base;
        };
        base = collapsed;
    }
}
