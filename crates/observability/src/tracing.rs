//! Subscriber installation.

use tracing_subscriber::EnvFilter;

/// Install the JSON subscriber with `default_filter` as the fallback
/// directive. Returns `false` if a global subscriber was already set.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // JSON logs + timestamps, configurable via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .with_current_span(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    #[test]
    fn second_init_is_a_no_op() {
        super::init("debug");
        assert!(!super::init("debug"));
        ::tracing::info!(component = "observability", "still logging after re-init");
    }
}
