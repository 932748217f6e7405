//! Log filter construction.

use tracing_subscriber::EnvFilter;

/// Directives applied when `RUST_LOG` is unset: the configured level scopes
/// the gateway's own spans, middleware logging stays at debug.
pub fn default_directives(log_level: &str) -> String {
    format!("hookgate={log_level},tower_http=debug")
}

/// Build the log filter. `RUST_LOG` wins over the configured level.
pub fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directives(log_level).into())
}
