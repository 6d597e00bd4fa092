use tracing_subscriber::EnvFilter;

/// The job logs at debug; HTTP client internals stay at warn.
pub const DEFAULT_FILTER: &str = "debug,reqwest=warn,hyper=warn,hyper_util=warn,h2=warn,rustls=warn";

/// Install the process-wide stderr subscriber. `RUST_LOG` overrides the default filter.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}
