//! Process-wide log setup shared by the report binaries.

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat};

/// Initialize logging with the defaults: JSON lines, `info` unless `RUST_LOG`
/// says otherwise.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init(&LogConfig::default());
}

/// Initialize logging with an explicit configuration.
pub fn init_with(config: &LogConfig) {
    self::tracing::init(config);
}
