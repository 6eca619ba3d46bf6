// crates/turbdiag-cli/src/logging.rs

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the stderr subscriber. Levels come from `TURBDIAG_LOG`
/// (e.g. `TURBDIAG_LOG=turbdiag_core=debug`), falling back to `turbdiag=info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TURBDIAG_LOG")
            .unwrap_or_else(|_| EnvFilter::new("turbdiag=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
