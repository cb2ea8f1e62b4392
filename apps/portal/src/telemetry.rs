use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs the global subscriber for the `portal` binary.
///
/// `RUST_LOG` wins when set. Output is JSON unless `json` is false, in which
/// case a compact human-readable format is used.
pub fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portal=info,reqwest=warn,hyper=warn"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
            .with_writer(std::io::stderr)
            .json();
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact();
        registry.with(fmt_layer).init();
    }
}
