//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

/// Install the process-wide subscriber: JSON lines on stdout, filtered via
/// `RUST_LOG` with `info` as the fallback.
///
/// Returns whether this call installed the subscriber. Repeat calls lose the
/// race against the first and report `false`; tests that spin up several
/// servers in one process rely on that being harmless.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    #[test]
    fn repeat_init_is_a_noop() {
        super::init();
        assert!(!super::init());
    }
}
