mod types;
pub use types::{BatchConfig, BatchOutput, ItemOutcome, ItemRecord, PassThroughReason};

mod utils;
pub use utils::{pair_uploads, process_batch, process_item, result_file_name, ProcessedItem};
pub use utils::{load_uploads, process_paths};
