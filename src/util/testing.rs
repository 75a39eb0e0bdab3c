use std::sync::Once;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

static TEST_SETUP: Once = Once::new();

/// Route tracing output of the tree into the test harness, once per binary.
///
/// `RUST_LOG` overrides the default of tracing this crate only.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("nightingale_tree=trace"));
        // Another subscriber may already own the global slot; keep it.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .try_init();
    });
}
