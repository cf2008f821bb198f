//! Execution lifecycle hooks: start-up checks, teardown, retries, and per-test logging.

// std
use std::{
	fs,
	path::PathBuf,
	sync::atomic::{AtomicU32, Ordering},
};
// self
use crate::{
	_prelude::*,
	auth::AuthManager,
	config::{Endpoint, HarnessConfig, PROFILE_VAR},
	data::{CleanupError, CleanupRegistry, CleanupReport},
	error::BoxError,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Default directory for run metadata.
pub const DEFAULT_RESULTS_DIR: &str = "target/sc-results";
/// Environment variable overriding [`DEFAULT_RESULTS_DIR`].
pub const RESULTS_DIR_VAR: &str = "SC_RESULTS_DIR";
/// Name of the run metadata file.
pub const ENVIRONMENT_FILE: &str = "environment.properties";

const HEALTH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

/// Hooks run once before the first test and once after the last.
#[derive(Clone, Debug)]
pub struct Execution {
	config: Arc<HarnessConfig>,
	cleanup: CleanupRegistry,
	tokens: AuthManager,
	results_dir: PathBuf,
	profile: Option<String>,
}
impl Execution {
	/// Wires the hooks to the shared registry and token cache.
	pub fn new(config: Arc<HarnessConfig>, cleanup: CleanupRegistry, tokens: AuthManager) -> Self {
		Self {
			config,
			cleanup,
			tokens,
			results_dir: std::env::var(RESULTS_DIR_VAR)
				.map(PathBuf::from)
				.unwrap_or_else(|_| PathBuf::from(DEFAULT_RESULTS_DIR)),
			profile: std::env::var(PROFILE_VAR).ok().filter(|p| !p.is_empty()),
		}
	}

	/// Overrides the metadata directory.
	pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.results_dir = dir.into();

		self
	}

	/// Overrides the reported profile name.
	pub fn with_profile(mut self, profile: Option<String>) -> Self {
		self.profile = profile;

		self
	}

	/// Logs the effective settings, writes run metadata, and checks the backend health endpoint.
	///
	/// Fails with [`Error::ApiNotAvailable`] when the health check gets no HTTP answer within 5 seconds.
	pub async fn start(&self) -> Result<()> {
		tracing::info!("=== Test Execution Started ===");
		tracing::info!(base_url = %self.config.base_url, "Base URL.");
		tracing::info!(enabled = self.config.auth.enabled, "Auth enabled.");
		tracing::info!(
			parallel = %self.config.execution.parallel,
			threads = self.config.execution.thread_count,
			"Parallel mode."
		);

		if let Err(e) = self.write_environment_properties() {
			tracing::warn!(error = %e, "Failed to write environment properties.");
		}

		self.verify_api_availability().await
	}

	/// Drains the cleanup registry when enabled and always clears the token cache.
	///
	/// Cleanup failures are logged, never propagated; the outcome is returned for inspection.
	/// `None` means cleanup is disabled.
	pub async fn finish(&self) -> Option<Result<CleanupReport, CleanupError>> {
		tracing::info!("=== Test Execution Finished ===");

		let outcome = if self.config.cleanup.enabled {
			tracing::info!(registered = self.cleanup.len(), "Running cleanup.");

			let outcome = self.cleanup.execute_all().await;

			if let Err(e) = &outcome {
				tracing::error!(error = %e, "Some cleanup actions failed.");
			}

			Some(outcome)
		} else {
			None
		};

		self.tokens.clear_cache();

		tracing::info!("=== Cleanup Complete ===");

		outcome
	}

	/// Path of the metadata file.
	pub fn environment_file(&self) -> PathBuf {
		self.results_dir.join(ENVIRONMENT_FILE)
	}

	/// Writes `environment.properties` into the results directory.
	pub fn write_environment_properties(&self) -> std::io::Result<PathBuf> {
		let config = &self.config;
		let entries = [
			("Base URL", config.base_url.to_string()),
			("Timeout", config.timeout_ms.to_string()),
			("Auth Enabled", config.auth.enabled.to_string()),
			("Parallel Mode", config.execution.parallel.clone()),
			("Thread Count", config.execution.thread_count.to_string()),
			("Environment Profile", self.profile.clone().unwrap_or_else(|| "default".into())),
			("Retry Max Attempts", config.retry.max_attempts.to_string()),
			("Retry Backoff (ms)", config.retry.backoff_ms.to_string()),
			("Cleanup Enabled", config.cleanup.enabled.to_string()),
			("Mailpit URL", config.mailpit.base_url.to_string()),
			("Harness Version", env!("CARGO_PKG_VERSION").to_owned()),
			("OS", std::env::consts::OS.to_owned()),
		];
		let path = self.environment_file();

		fs::create_dir_all(&self.results_dir)?;
		fs::write(&path, render_properties(&entries))?;

		tracing::info!(path = %path.display(), "Environment properties written.");

		Ok(path)
	}

	async fn verify_api_availability(&self) -> Result<()> {
		const KIND: OpKind = OpKind::HealthCheck;

		let base_url = self.config.base_url.as_str().trim_end_matches('/').to_owned();
		let health_url = format!("{base_url}{}", Endpoint::HEALTH);
		let span = OpSpan::new(KIND, "verify_api_availability");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result: Result<()> = span
			.instrument(async move {
				tracing::info!(url = %health_url, "Checking API availability.");

				let unavailable =
					|source: BoxError| Error::ApiNotAvailable { base_url: base_url.clone(), source };
				let client = ReqwestClient::builder()
					.connect_timeout(HEALTH_TIMEOUT)
					.timeout(HEALTH_TIMEOUT)
					.build()
					.map_err(|e| unavailable(Box::new(e)))?;
				let response =
					client.get(&health_url).send().await.map_err(|e| unavailable(Box::new(e)))?;
				let status = response.status().as_u16();
				let body = response.text().await.unwrap_or_default();

				tracing::info!(status, body = %body, "API health check.");

				Ok(())
			})
			.await;

		match &result {
			Ok(()) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}
}

/// Approves re-runs of a failed test up to the configured attempt budget.
#[derive(Debug)]
pub struct RetryPolicy {
	max_attempts: u32,
	backoff: std::time::Duration,
	attempts: AtomicU32,
}
impl RetryPolicy {
	/// Creates a fresh policy for one test.
	pub fn new(max_attempts: u32, backoff: std::time::Duration) -> Self {
		Self { max_attempts, backoff, attempts: AtomicU32::new(0) }
	}

	/// Creates a policy from the retry config section.
	pub fn from_config(config: &HarnessConfig) -> Self {
		Self::new(config.retry.max_attempts, std::time::Duration::from_millis(config.retry.backoff_ms))
	}

	/// Counts an attempt and, while within budget, sleeps the backoff and returns `true`.
	pub async fn should_retry(&self, test_name: &str) -> bool {
		if self.max_attempts == 0 {
			return false;
		}

		let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

		if attempt > self.max_attempts {
			return false;
		}

		tracing::warn!(
			test = test_name,
			attempt,
			max = self.max_attempts,
			backoff_ms = self.backoff.as_millis() as u64,
			"Retrying test."
		);

		if !self.backoff.is_zero() {
			tokio::time::sleep(self.backoff).await;
		}

		true
	}

	/// Retries approved so far.
	pub fn attempts(&self) -> u32 {
		self.attempts.load(Ordering::SeqCst).min(self.max_attempts)
	}

	/// Runs `test` until it succeeds or the policy stops approving retries.
	pub async fn run<F, Fut, T, E>(&self, test_name: &str, mut test: F) -> Result<T, E>
	where
		F: FnMut() -> Fut,
		Fut: Future<Output = Result<T, E>>,
	{
		loop {
			let error = match test().await {
				Ok(value) => return Ok(value),
				Err(e) => e,
			};

			if !self.should_retry(test_name).await {
				return Err(error);
			}
		}
	}
}

/// Final state of a single test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TestOutcome {
	/// Assertions held.
	Passed,
	/// An assertion or harness call failed.
	Failed,
	/// Not executed.
	Skipped,
}
impl TestOutcome {
	/// Returns a stable upper-case label.
	pub const fn as_str(self) -> &'static str {
		match self {
			TestOutcome::Passed => "PASSED",
			TestOutcome::Failed => "FAILED",
			TestOutcome::Skipped => "SKIPPED",
		}
	}

	/// Logs the outcome; failures include the error's detailed report when one is given.
	pub fn log(self, test_name: &str, elapsed: std::time::Duration, error: Option<&Error>) {
		let elapsed_ms = elapsed.as_millis() as u64;

		match self {
			TestOutcome::Passed => tracing::info!(test = test_name, elapsed_ms, "PASSED."),
			TestOutcome::Failed => {
				tracing::error!(test = test_name, elapsed_ms, "FAILED.");

				if let Some(e) = error {
					tracing::error!(test = test_name, kind = e.kind(), "{}", e.detailed_message());
				}
			},
			TestOutcome::Skipped => tracing::warn!(test = test_name, "SKIPPED."),
		}
	}
}
impl Display for TestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Logs the start of a test.
pub fn log_test_start(test_name: &str) {
	tracing::info!(test = test_name, "Starting test.");
}

/// Pass/fail/skip tallies for a suite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SuiteSummary {
	/// Passed tests.
	pub passed: u32,
	/// Failed tests.
	pub failed: u32,
	/// Skipped tests.
	pub skipped: u32,
}
impl SuiteSummary {
	/// Adds one outcome.
	pub fn record(&mut self, outcome: TestOutcome) {
		match outcome {
			TestOutcome::Passed => self.passed += 1,
			TestOutcome::Failed => self.failed += 1,
			TestOutcome::Skipped => self.skipped += 1,
		}
	}

	/// Logs the tallies.
	pub fn log(&self, suite: &str) {
		tracing::info!(
			suite,
			passed = self.passed,
			failed = self.failed,
			skipped = self.skipped,
			"Suite finished."
		);
	}
}

fn render_properties(entries: &[(&str, String)]) -> String {
	let mut out = String::from("#Harness Environment Properties\n");

	for (key, value) in entries {
		out.push_str(&escape_property(key, true));
		out.push('=');
		out.push_str(&escape_property(value, false));
		out.push('\n');
	}

	out
}

fn escape_property(raw: &str, is_key: bool) -> String {
	let mut out = String::with_capacity(raw.len());

	for c in raw.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'=' | ':' | '#' | '!' => {
				out.push('\\');
				out.push(c);
			},
			' ' if is_key => out.push_str("\\ "),
			'\n' => out.push_str("\\n"),
			_ => out.push(c),
		}
	}

	out
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn properties_escape_keys_and_values() {
		let rendered = render_properties(&[("Base URL", "http://localhost:8080/".into())]);

		assert!(rendered.starts_with('#'));
		assert!(rendered.contains("Base\\ URL=http\\://localhost\\:8080/\n"));
	}

	#[tokio::test]
	async fn retry_policy_respects_budget() {
		let disabled = RetryPolicy::new(0, std::time::Duration::ZERO);

		assert!(!disabled.should_retry("t").await);

		let policy = RetryPolicy::new(2, std::time::Duration::ZERO);

		assert!(policy.should_retry("t").await);
		assert!(policy.should_retry("t").await);
		assert!(!policy.should_retry("t").await);
		assert_eq!(policy.attempts(), 2);
	}

	#[tokio::test]
	async fn retry_policy_reruns_until_success() {
		let policy = RetryPolicy::new(3, std::time::Duration::ZERO);
		let calls = AtomicU32::new(0);
		let result: Result<u32, &str> = policy
			.run("flaky", || {
				let call = calls.fetch_add(1, Ordering::SeqCst) + 1;

				async move { if call < 3 { Err("flaky") } else { Ok(call) } }
			})
			.await;

		assert_eq!(result, Ok(3));
		assert_eq!(policy.attempts(), 2);
	}

	#[test]
	fn suite_summary_tallies() {
		let mut summary = SuiteSummary::default();

		for outcome in [TestOutcome::Passed, TestOutcome::Failed, TestOutcome::Passed] {
			summary.record(outcome);
		}

		assert_eq!(summary, SuiteSummary { passed: 2, failed: 1, skipped: 0 });
		assert_eq!(TestOutcome::Skipped.to_string(), "SKIPPED");
	}
}
