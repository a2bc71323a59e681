use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise the debug flag picks the level.
pub fn init_logging(debug: bool) {
    let default_directives = if debug {
        "site_web=debug,tower_http=debug"
    } else {
        "site_web=info,tower_http=info"
    };

    let filter = std::env::var("RUST_LOG")
        .ok()
        .map(EnvFilter::new)
        .unwrap_or_else(|| EnvFilter::new(default_directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug)
        .init();
}
