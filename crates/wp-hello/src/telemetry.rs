use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the JSON log subscriber. Logs go to stderr; stdout carries only
/// the module result.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("wp_hello=info,wp_xmlrpc=info")),
        )
        .with(fmt::layer().json().with_writer(std::io::stderr))
        .init();
}
