mod routes;
mod types;

pub use routes::{router, shutdown_signal, INPAINT_BATCH_PATH};
pub use types::{ApiError, AppState, ErrorResponse, ServerConfig};
pub use types::{DEFAULT_HOST, DEFAULT_MAX_UPLOAD_MB, DEFAULT_PORT};
