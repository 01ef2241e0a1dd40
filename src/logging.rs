use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Log level used when `RUST_LOG` is not set.
#[must_use]
pub const fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 | 1 => "warn",
        2 => "info",
        _ => "debug",
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the verbosity level.
///
/// Calling this more than once is harmless; later calls keep the first subscriber.
pub fn init(verbose: u8) {
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init();
}
