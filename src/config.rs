//! Layered harness configuration: `application.yml`, an optional profile overlay, and
//! environment overrides.

pub mod endpoint;
pub mod group;

pub use endpoint::Endpoint;
pub use group::{GroupFilter, TestGroup};

// std
use std::{
	fs,
	path::{Path, PathBuf},
};
// self
use crate::_prelude::*;

/// Base configuration file name.
pub const BASE_FILE: &str = "application.yml";
/// Environment variable naming the active profile (`application-<profile>.yml`).
pub const PROFILE_VAR: &str = "SC_ENV";

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_MAILPIT_URL: &str = "http://localhost:8025";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_THREAD_COUNT: u32 = 1;
const DEFAULT_MAILPIT_TIMEOUT_SECONDS: u64 = 15;
const DEFAULT_MAILPIT_POLL_INTERVAL_MS: u64 = 1_000;

/// Configuration loading and override failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// The required base file is absent.
	#[error("Required configuration file not found: {}.", .path.display())]
	MissingFile {
		/// Path that was searched.
		path: PathBuf,
	},
	/// A file could not be read.
	#[error("Failed to read configuration from {}.", .path.display())]
	Read {
		/// Path that failed.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// A file is not valid YAML for [`HarnessConfig`].
	#[error("Failed to load configuration from {file}.")]
	Parse {
		/// File name (or `<inline>`).
		file: String,
		/// Underlying YAML failure.
		#[source]
		source: serde_yaml::Error,
	},
	/// An environment override could not be parsed.
	#[error("Invalid value `{value}` for {key}.")]
	InvalidOverride {
		/// Variable name.
		key: &'static str,
		/// Raw value supplied.
		value: String,
	},
	/// The HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild(#[source] ReqwestError),
}
impl ConfigError {
	/// Returns the file name associated with the failure, when any.
	pub fn file(&self) -> Option<&str> {
		match self {
			Self::MissingFile { path } | Self::Read { path, .. } => path.to_str(),
			Self::Parse { file, .. } => Some(file),
			_ => None,
		}
	}
}

/// Root harness configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HarnessConfig {
	/// Backend base URL.
	pub base_url: Url,
	/// Per-request timeout in milliseconds.
	#[serde(rename = "timeout")]
	pub timeout_ms: u64,
	/// Parallelism and group selection.
	pub execution: ExecutionConfig,
	/// Authentication settings.
	pub auth: AuthConfig,
	/// Test retry policy.
	pub retry: RetryConfig,
	/// Teardown settings.
	pub cleanup: CleanupConfig,
	/// Mailpit capture service settings.
	pub mailpit: MailpitConfig,
}
impl HarnessConfig {
	/// Loads `application.yml` from `dir`, overlays the active profile, then applies
	/// process environment overrides.
	pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
		Self::load_with(dir, |key| std::env::var(key).ok())
	}

	/// Same as [`HarnessConfig::load`] with an injected variable lookup.
	pub fn load_with<F>(dir: impl AsRef<Path>, lookup: F) -> Result<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let dir = dir.as_ref();
		let base_path = dir.join(BASE_FILE);

		if !base_path.exists() {
			return Err(ConfigError::MissingFile { path: base_path }.into());
		}

		let mut config = Self::from_file(&base_path)?;

		if let Some(profile) = lookup(PROFILE_VAR).filter(|p| !p.is_empty()) {
			let profile_path = dir.join(format!("application-{profile}.yml"));

			if profile_path.exists() {
				config.merge(Self::from_file(&profile_path)?);
			} else {
				tracing::warn!(path = %profile_path.display(), "Configuration profile not found.");
			}
		}

		config.apply_env_overrides(lookup)?;

		tracing::info!(
			base_url = %config.base_url,
			auth_enabled = config.auth.enabled,
			"Configuration loaded."
		);

		Ok(config)
	}

	/// Parses a single YAML document.
	pub fn from_yaml_str(src: &str) -> Result<Self> {
		Self::parse(src, "<inline>")
	}

	fn from_file(path: &Path) -> Result<Self> {
		let src = fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.to_owned(), source })?;
		let file = path.file_name().and_then(|n| n.to_str()).unwrap_or("<unknown>");

		Self::parse(&src, file)
	}

	fn parse(src: &str, file: &str) -> Result<Self> {
		if src.trim().is_empty() {
			return Ok(Self::default());
		}

		serde_yaml::from_str(src)
			.map_err(|source| ConfigError::Parse { file: file.to_owned(), source }.into())
	}

	/// Overlays a profile onto `self`; only non-default overlay values win.
	pub fn merge(&mut self, overlay: Self) {
		let defaults = Self::default();

		if overlay.base_url != defaults.base_url {
			self.base_url = overlay.base_url;
		}
		if overlay.timeout_ms != DEFAULT_TIMEOUT_MS {
			self.timeout_ms = overlay.timeout_ms;
		}
		if overlay.auth.enabled {
			self.auth.enabled = true;
		}
		if !overlay.auth.tier_credentials.is_empty() {
			self.auth.tier_credentials = overlay.auth.tier_credentials;
		}
		if overlay.retry.max_attempts != 0 {
			self.retry.max_attempts = overlay.retry.max_attempts;
		}
		if overlay.execution.thread_count != DEFAULT_THREAD_COUNT {
			self.execution.thread_count = overlay.execution.thread_count;
		}
		if overlay.mailpit.base_url != defaults.mailpit.base_url {
			self.mailpit.base_url = overlay.mailpit.base_url;
		}
		if overlay.mailpit.timeout_seconds != DEFAULT_MAILPIT_TIMEOUT_SECONDS {
			self.mailpit.timeout_seconds = overlay.mailpit.timeout_seconds;
		}
		if overlay.mailpit.poll_interval_ms != DEFAULT_MAILPIT_POLL_INTERVAL_MS {
			self.mailpit.poll_interval_ms = overlay.mailpit.poll_interval_ms;
		}
	}

	/// Applies `SC_*` overrides resolved through `lookup`.
	pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(raw) = lookup("SC_BASE_URL") {
			self.base_url = parse_override("SC_BASE_URL", &raw)?;
		}
		if let Some(raw) = lookup("SC_TIMEOUT") {
			self.timeout_ms = parse_override("SC_TIMEOUT", &raw)?;
		}
		if let Some(raw) = lookup("SC_AUTH_ENABLED") {
			self.auth.enabled = parse_override("SC_AUTH_ENABLED", &raw)?;
		}
		if let Some(raw) = lookup("SC_PARALLEL") {
			self.execution.parallel = raw;
		}
		if let Some(raw) = lookup("SC_THREAD_COUNT") {
			self.execution.thread_count = parse_override("SC_THREAD_COUNT", &raw)?;
		}
		if let Some(raw) = lookup("SC_MAILPIT_TIMEOUT") {
			self.mailpit.timeout_seconds = parse_override("SC_MAILPIT_TIMEOUT", &raw)?;
		}
		if let Some(raw) = lookup("SC_MAILPIT_POLL_INTERVAL") {
			self.mailpit.poll_interval_ms = parse_override("SC_MAILPIT_POLL_INTERVAL", &raw)?;
		}

		Ok(())
	}

	/// Request timeout as a std duration.
	pub fn request_timeout(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.timeout_ms)
	}
}
impl Default for HarnessConfig {
	fn default() -> Self {
		Self {
			base_url: default_url(DEFAULT_BASE_URL),
			timeout_ms: DEFAULT_TIMEOUT_MS,
			execution: ExecutionConfig::default(),
			auth: AuthConfig::default(),
			retry: RetryConfig::default(),
			cleanup: CleanupConfig::default(),
			mailpit: MailpitConfig::default(),
		}
	}
}

/// Parallel execution and group selection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutionConfig {
	/// Parallel mode label (`none`, `methods`, `classes`).
	pub parallel: String,
	/// Worker count when parallel.
	pub thread_count: u32,
	/// Comma-separated default groups.
	pub groups: String,
}
impl Default for ExecutionConfig {
	fn default() -> Self {
		Self { parallel: "none".into(), thread_count: DEFAULT_THREAD_COUNT, groups: String::new() }
	}
}

/// Authentication settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthConfig {
	/// Global switch; when off every auth context resolves to disabled.
	pub enabled: bool,
	/// Login endpoint path.
	pub token_endpoint: String,
	/// Refresh endpoint path.
	pub refresh_endpoint: String,
	/// Credentials per capability tier label.
	pub tier_credentials: BTreeMap<String, TierCredentials>,
}
impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			enabled: false,
			token_endpoint: Endpoint::AUTH_LOGIN.into(),
			refresh_endpoint: Endpoint::AUTH_REFRESH.into(),
			tier_credentials: BTreeMap::new(),
		}
	}
}

/// Login credentials for one tier.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TierCredentials {
	/// Login e-mail.
	pub email: String,
	/// Login password; never logged.
	pub password: String,
}
impl TierCredentials {
	/// Creates a credential pair.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}
impl Debug for TierCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TierCredentials")
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Retry policy for failed tests.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryConfig {
	/// Maximum retries; zero disables retrying.
	pub max_attempts: u32,
	/// Sleep before each retry.
	pub backoff_ms: u64,
}
impl Default for RetryConfig {
	fn default() -> Self {
		Self { max_attempts: 0, backoff_ms: 1_000 }
	}
}

/// Teardown settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
	/// Whether the registry is drained at execution finish.
	pub enabled: bool,
	/// Strategy label, informational.
	pub strategy: String,
}
impl Default for CleanupConfig {
	fn default() -> Self {
		Self { enabled: true, strategy: "after_suite".into() }
	}
}

/// Mailpit capture service settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MailpitConfig {
	/// Mailpit base URL.
	pub base_url: Url,
	/// Default poll budget.
	pub timeout_seconds: u64,
	/// Sleep between polls.
	pub poll_interval_ms: u64,
}
impl MailpitConfig {
	/// Poll budget as a std duration.
	pub fn timeout(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.timeout_seconds)
	}

	/// Poll interval as a std duration.
	pub fn poll_interval(&self) -> std::time::Duration {
		std::time::Duration::from_millis(self.poll_interval_ms)
	}
}
impl Default for MailpitConfig {
	fn default() -> Self {
		Self {
			base_url: default_url(DEFAULT_MAILPIT_URL),
			timeout_seconds: DEFAULT_MAILPIT_TIMEOUT_SECONDS,
			poll_interval_ms: DEFAULT_MAILPIT_POLL_INTERVAL_MS,
		}
	}
}

fn default_url(raw: &str) -> Url {
	Url::parse(raw).unwrap_or_else(|e| unreachable!("Built-in URL `{raw}` must parse: {e}."))
}

fn parse_override<T>(key: &'static str, raw: &str) -> Result<T>
where
	T: FromStr,
{
	raw.trim().parse().map_err(|_| ConfigError::InvalidOverride { key, value: raw.to_owned() }.into())
}
