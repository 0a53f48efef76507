//! Logging system for the sessionizer
//!
//! The terminal belongs to the picker, so logs only ever go to a file,
//! with age-based retention.

mod file_writer;
mod retention;

pub use file_writer::{init_file_logging, LogFileInfo, LoggingGuard};
pub use retention::{cleanup_old_logs, cleanup_old_logs_with_retention, DEFAULT_RETENTION_DAYS};

/// Prefix shared by every log file this program writes
pub(crate) const LOG_FILE_PREFIX: &str = "sessionizer-";
