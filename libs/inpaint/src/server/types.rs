use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use crate::error::BatchError;
use crate::inpaint::{InpaintEngine, InpaintMode, DEFAULT_RADIUS};
use crate::process::BatchConfig;

pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 256;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "HTTP service that inpaints batches of image/mask pairs", long_about = None)]
pub struct ServerConfig {
    #[arg(long, env = "HOST", default_value_t = DEFAULT_HOST, help = "address to listen on")]
    pub host: IpAddr,
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT, help = "port to listen on")]
    pub port: u16,
    #[arg(long, env = "INPAINT_RADIUS", default_value_t = DEFAULT_RADIUS, help = "neighbourhood radius used to fill masked pixels")]
    pub radius: u32,
    #[arg(long, env = "MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB, help = "largest accepted request body in MiB")]
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            radius: DEFAULT_RADIUS,
            max_upload_mb: DEFAULT_MAX_UPLOAD_MB,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(self.radius, InpaintMode::FastMarching)
    }
}

/// Shared by every request; the engine must be stateless.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn InpaintEngine>,
    pub batch_config: BatchConfig,
}

impl AppState {
    pub fn new(engine: Arc<dyn InpaintEngine>, batch_config: BatchConfig) -> Self {
        Self { engine, batch_config }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Request-level failure rendered as `{"error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<BatchError> for ApiError {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::CountMismatch { .. } => ApiError::bad_request(err.to_string()),
            BatchError::Archive(_) | BatchError::Io(_) => ApiError::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_reads_flags() {
        let config = ServerConfig::try_parse_from([
            "inpaint-server",
            "--host",
            "127.0.0.1",
            "--port",
            "9001",
            "--radius",
            "5",
            "--max-upload-mb",
            "2",
        ])
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:9001".parse().unwrap());
        assert_eq!(config.batch_config().radius, 5);
        assert_eq!(config.max_body_bytes(), 2 * 1024 * 1024);
    }

    #[test]
    fn default_matches_documented_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.radius, 3);
        assert_eq!(config.batch_config().mode, InpaintMode::FastMarching);
    }

    #[test]
    fn flag_defaults_agree_with_default_impl() {
        let unset = ["HOST", "PORT", "INPAINT_RADIUS", "MAX_UPLOAD_MB"]
            .iter()
            .all(|name| std::env::var_os(name).is_none());
        if !unset {
            return;
        }

        let parsed = ServerConfig::try_parse_from(["inpaint-server"]).unwrap();
        let default = ServerConfig::default();
        assert_eq!(parsed.socket_addr(), default.socket_addr());
        assert_eq!(parsed.radius, default.radius);
        assert_eq!(parsed.max_upload_mb, default.max_upload_mb);
    }

    #[test]
    fn count_mismatch_maps_to_bad_request() {
        let err = ApiError::from(BatchError::CountMismatch { images: 2, masks: 1 });
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, "images and masks count mismatch");
    }
}
