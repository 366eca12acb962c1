use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, before the system starts.
///
/// `RUST_LOG` wins when set; otherwise `default_level` is used.
///
/// ```bash
/// RUST_LOG=debug cargo run                        # everything
/// RUST_LOG=storefront::store=debug cargo run      # store actor only
/// ```
pub fn setup_tracing(default_level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
