use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` for this crate
/// when `verbose` is on. Stdout stays reserved for report output.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,bizmap=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // A second init (e.g. in tests) is harmless
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .try_init();
}
