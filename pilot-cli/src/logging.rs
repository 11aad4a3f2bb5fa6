use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stderr subscriber.
///
/// `FOUNDERPILOT_LOG` wins over `RUST_LOG`; without either, `--verbose` selects
/// `debug` and the default is `warn` so command output stays clean.
pub fn init_logging(verbose: bool) {
    let filter = if let Ok(spec) = std::env::var("FOUNDERPILOT_LOG") {
        EnvFilter::new(spec)
    } else if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}
