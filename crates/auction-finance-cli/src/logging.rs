use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber. `RUST_LOG` wins over `verbose` when set.
pub fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let default = if verbose {
            "auction_finance=debug"
        } else {
            "auction_finance=info"
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

        fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    });
}
