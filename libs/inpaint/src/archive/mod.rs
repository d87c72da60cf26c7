mod builder;

pub use builder::ArchiveBuilder;
pub use builder::{ARCHIVE_FILE_NAME, ARCHIVE_MEDIA_TYPE};
