//! Logging setup for the CLI.
//!
//! Library crates only emit `tracing` events; the subscriber is installed here.
//!
//! # Example
//!
//! ```rust,no_run
//! use sammi_cli::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("Starting build");
//! debug!("Resolved entry: {}", "src/script.ts");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const VERBOSE_FILTER: &str = "sammi_next=debug,sammi_cli=debug,sammi_bundler=debug,sammi_config=debug";
const QUIET_FILTER: &str = "sammi_next=error,sammi_cli=error,sammi_bundler=error,sammi_config=error";
const DEFAULT_FILTER: &str = "sammi_next=info,sammi_cli=info,sammi_bundler=info,sammi_config=info";

/// Install the global tracing subscriber.
///
/// The level is chosen in this order:
/// 1. `--verbose`: debug for the sammi crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`, when set
/// 4. info for the sammi crates
///
/// Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .without_time()
        .with_ansi(!no_color && crate::ui::should_use_color())
        .compact();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}
