//! Tracing subscriber setup shared by the server and seed binaries.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset. `seed` is the seed binary's own target.
pub const DEFAULT_DIRECTIVES: &str = "portfolio_api=info,seed=info,tower_http=info";

/// Install the fmt subscriber. `RUST_LOG` wins over [`DEFAULT_DIRECTIVES`].
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
