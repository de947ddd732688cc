use crate::config::toml_config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over these.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        // reqwest/hyper stay at info so request bodies are not dumped.
        "mevoq_content=debug,info"
    } else {
        "mevoq_content=info,warn"
    }
}

fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

/// Picks the subscriber from the merged `[logging]` settings.
pub fn init_logger(logging: &LoggingConfig) {
    if logging.json {
        init_json_logger();
    } else {
        init_cli_logger(logging.verbose);
    }
}

/// Human-readable lines on stderr; stdout is reserved for command output.
pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(verbose)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

/// One JSON object per event, with the emitting module so fallback warnings
/// can be traced to a resolver or adapter.
pub fn init_json_logger() {
    tracing_subscriber::registry()
        .with(filter(false))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
