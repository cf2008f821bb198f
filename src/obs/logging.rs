// std
use std::sync::OnceLock;
// crates.io
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_FILTER: &str = "info";

static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Installs a global `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Safe to call from every test; only the first call has an effect. Returns `false` when
/// another subscriber was already installed by the host process.
pub fn init_logging() -> bool {
	*INSTALLED.get_or_init(|| {
		let filter =
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

		fmt().with_env_filter(filter).with_target(false).with_test_writer().try_init().is_ok()
	})
}
