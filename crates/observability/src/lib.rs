//! Tracing/logging setup shared by every binary.

/// Initialize process-wide logging with JSON output.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() -> bool {
    tracing::init(LogFormat::Json)
}

/// Initialize process-wide logging with an explicit output format.
pub fn init_with(format: LogFormat) -> bool {
    tracing::init(format)
}

/// Tracing configuration (filters, layers).
pub mod tracing;

pub use self::tracing::{LogFormat, ParseLogFormatError};
