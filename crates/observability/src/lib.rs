//! Logging setup shared by the storefront binaries and tests.

pub mod tracing;

pub use tracing::{LogFormat, LogSettings};

/// Initialize process-wide logging from the environment.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    tracing::init(&LogSettings::from_env());
}
