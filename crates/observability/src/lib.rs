//! Process-wide tracing/logging setup.

pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; only the first call installs a subscriber.
pub fn init() {
    tracing::init();
}
