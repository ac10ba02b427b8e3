//! Tracing and logging setup shared by every binary that embeds the engine.

/// Initialize process-wide logging with JSON output and `RUST_LOG` filtering.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Initialize logging from an explicit [`LogConfig`].
pub fn init_with(config: &LogConfig) {
    tracing::init_with(config);
}

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};
