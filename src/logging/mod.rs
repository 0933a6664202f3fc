// Logging setup
//
// `RUST_LOG` wins when set. Otherwise the debug toggle picks the filter.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "copyforge=info,tower_http=info";
const DEBUG_FILTER: &str = "copyforge=debug,tower_http=debug";

/// Filter directives for the given toggle, ignoring `RUST_LOG`.
pub fn default_directives(debug_logging: bool) -> &'static str {
    if debug_logging {
        DEBUG_FILTER
    } else {
        DEFAULT_FILTER
    }
}

/// Install the global tracing subscriber. Safe to call more than once; only
/// the first call takes effect.
pub fn init_tracing(debug_logging: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug_logging)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(debug_logging)
        .try_init();
}
