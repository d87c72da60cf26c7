use axum::{
    extract::{
        multipart::{Multipart, MultipartError, MultipartRejection},
        DefaultBodyLimit, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use super::types::{ApiError, AppState, ServerConfig};
use crate::archive::{ARCHIVE_FILE_NAME, ARCHIVE_MEDIA_TYPE};
use crate::common::UploadFile;
use crate::process::process_batch;

pub const INPAINT_BATCH_PATH: &str = "/api/inpaint-batch";

/// Builds the service. CORS is wide open (any origin, method and header,
/// credentials allowed) and request bodies are capped at
/// `config.max_body_bytes()`.
pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "healthy" }))
        .route(INPAINT_BATCH_PATH, post(inpaint_batch))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes()))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn inpaint_batch(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, ApiError> {
    let multipart = multipart.map_err(|rejection| {
        ApiError::new(rejection.status(), rejection.body_text())
    })?;
    let (images, masks) = read_uploads(multipart).await?;
    log::info!("Received {} images and {} masks", images.len(), masks.len());

    if images.is_empty() && masks.is_empty() {
        return Err(ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "images and masks are required",
        ));
    }

    let AppState { engine, batch_config } = state;
    let output = tokio::task::spawn_blocking(move || {
        process_batch(images, masks, engine.as_ref(), &batch_config)
    })
    .await
    .map_err(|e| ApiError::internal(format!("Batch worker failed: {}", e)))??;

    log::info!("Returning archive of {} bytes", output.archive.len());

    Ok((
        [
            (header::CONTENT_TYPE, ARCHIVE_MEDIA_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", ARCHIVE_FILE_NAME),
            ),
        ],
        output.archive,
    )
        .into_response())
}

/// Collects the repeated `images` and `masks` file fields in upload order.
async fn read_uploads(
    mut multipart: Multipart,
) -> Result<(Vec<UploadFile>, Vec<UploadFile>), ApiError> {
    let mut images = Vec::new();
    let mut masks = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let data = field.bytes().await.map_err(multipart_error)?;

        match name.as_str() {
            "images" => images.push(UploadFile::new(file_name, Vec::from(data))),
            "masks" => masks.push(UploadFile::new(file_name, Vec::from(data))),
            other => log::debug!("Ignoring multipart field {:?}", other),
        }
    }

    Ok((images, masks))
}

fn multipart_error(err: MultipartError) -> ApiError {
    log::warn!("Failed to read multipart body: {}", err);
    ApiError::new(err.status(), format!("Invalid multipart body: {}", err.body_text()))
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::warn!("Ctrl-C received, stopping..."),
        _ = terminate => log::warn!("SIGTERM received, stopping..."),
    }
}
