mod types;
mod utils;

pub use types::{UploadFile, UploadPair};
pub use utils::init_logger;
pub use utils::file_stem;
