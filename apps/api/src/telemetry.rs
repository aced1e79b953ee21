use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "blog_api=info,tower_http=info";

/// Installs the global fmt subscriber, filtered by `RUST_LOG`
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
