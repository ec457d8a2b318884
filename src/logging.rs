use std::io;
use std::path::Path;
use tracing_appender::rolling;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Default console filter; `RUST_LOG` overrides it.
pub const DEFAULT_FILTER: &str = "warn,llm_request=info,routing=warn,org_render=warn";

/// Console filter used with `--verbose`.
pub const VERBOSE_FILTER: &str = "info,llm_request=debug,routing=debug,org_render=debug";

pub fn configure_logging(log_dir: Option<&Path>, default_filter: &str) {
    // Console output goes to stderr so stdout stays clean for results
    let stderr_log = fmt::layer().with_writer(io::stderr).with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
    );

    // Optional daily rolling file log with full routing and rendering detail
    let file_log = log_dir.map(|dir| {
        let file_appender = rolling::daily(dir, "tarjama.log");
        fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender)
            .with_filter(EnvFilter::new(
                "info,llm_request=debug,routing=debug,org_render=trace",
            ))
    });

    tracing_subscriber::Registry::default()
        .with(stderr_log)
        .with(file_log)
        .init();
}
