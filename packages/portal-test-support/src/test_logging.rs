//! Subscriber for the portal test binaries.
//!
//! Installed once per binary: through `ctor` in the portal's `lib.rs` for
//! unit tests and from `tests/common` for integration tests.
//!
//! `TEST_LOG` takes an `EnvFilter` directive, or one of two shorthands:
//! `client` shows the portal's request/refresh trail, `mock` adds the
//! mock API's routing decisions. Without `TEST_LOG` the filter falls back
//! to `RUST_LOG`, then to warnings only. The actix server that backs
//! [`MockApi`](crate::MockApi) is capped at `error` unless a directive
//! names it.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const QUIET_SERVER: &str = "actix_server=error,actix_web=error,mio=error";

pub fn init() {
    INITIALIZED.get_or_init(|| {
        let directives = filter_directives(
            std::env::var("TEST_LOG").ok().as_deref(),
            std::env::var("RUST_LOG").ok().as_deref(),
        );

        fmt()
            .with_env_filter(EnvFilter::new(directives))
            .with_test_writer()
            .without_time()
            .with_target(true)
            .try_init()
            .ok();
    });
}

fn filter_directives(test_log: Option<&str>, rust_log: Option<&str>) -> String {
    let chosen = match test_log.map(str::trim).filter(|v| !v.is_empty()) {
        Some("client") => "warn,portal=debug".to_string(),
        Some("mock") => "warn,portal=debug,portal_test_support=debug".to_string(),
        Some(custom) => custom.to_string(),
        None => rust_log
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("warn")
            .to_string(),
    };

    if chosen.contains("actix") {
        chosen
    } else {
        format!("{chosen},{QUIET_SERVER}")
    }
}
