//! LIFO registry of teardown actions for state created during a test run.

// std
use std::{any::Any, panic::AssertUnwindSafe};
// crates.io
use futures::FutureExt;
// self
use crate::{
	_prelude::*,
	error::BoxError,
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Boxed future returned by a cleanup action.
pub type CleanupFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>>;

type ActionFn = Box<dyn FnOnce() -> CleanupFuture + Send>;

struct CleanupAction {
	description: String,
	run: ActionFn,
}

/// Thread-safe stack of teardown actions drained newest-first.
#[derive(Clone, Default)]
pub struct CleanupRegistry {
	actions: Arc<Mutex<Vec<CleanupAction>>>,
}
impl CleanupRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Pushes an action; it runs before every action registered earlier.
	pub fn register<F, Fut>(&self, description: impl Into<String>, action: F)
	where
		F: 'static + Send + FnOnce() -> Fut,
		Fut: 'static + Send + Future<Output = Result<(), BoxError>>,
	{
		let description = description.into();

		tracing::debug!(description = %description, "Cleanup registered.");

		self.actions.lock().push(CleanupAction {
			description,
			run: Box::new(move || Box::pin(action()) as CleanupFuture),
		});
	}

	/// Runs every pending action in LIFO order, including ones registered mid-drain.
	///
	/// A failing action never stops the drain. The registry is empty afterwards.
	pub async fn execute_all(&self) -> Result<CleanupReport, CleanupError> {
		const KIND: OpKind = OpKind::Cleanup;

		let span = OpSpan::new(KIND, "execute_all");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let mut total = 0;
				let mut failures = Vec::new();

				tracing::info!(pending = self.len(), "Executing cleanup actions.");

				// Pop one at a time so the lock is never held across an await.
				while let Some(CleanupAction { description, run }) = self.pop() {
					total += 1;

					// Panicking actions count as failures; the drain goes on.
					let outcome = AssertUnwindSafe(async move { run().await })
						.catch_unwind()
						.await
						.unwrap_or_else(|payload| Err(BoxError::from(panic_message(payload))));

					match outcome {
						Ok(()) => tracing::info!(description = %description, "Cleanup succeeded."),
						Err(error) => {
							tracing::warn!(description = %description, %error, "Cleanup failed.");

							failures.push(CleanupFailure { description, error });
						},
					}
				}

				tracing::info!(
					"Cleanup complete: {} succeeded, {} failed",
					total - failures.len(),
					failures.len()
				);

				if failures.is_empty() {
					Ok(CleanupReport { total, succeeded: total })
				} else {
					Err(CleanupError { total, failures })
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}

	/// Pending action count.
	pub fn len(&self) -> usize {
		self.actions.lock().len()
	}

	/// Whether no actions are pending.
	pub fn is_empty(&self) -> bool {
		self.actions.lock().is_empty()
	}

	/// Discards every pending action without running it.
	pub fn clear(&self) {
		self.actions.lock().clear();
	}

	/// Descriptions of pending actions, oldest first.
	pub fn descriptions(&self) -> Vec<String> {
		self.actions.lock().iter().map(|a| a.description.clone()).collect()
	}

	fn pop(&self) -> Option<CleanupAction> {
		self.actions.lock().pop()
	}
}
impl Debug for CleanupRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CleanupRegistry").field("pending", &self.len()).finish()
	}
}

/// Summary of a fully successful drain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CleanupReport {
	/// Actions executed.
	pub total: usize,
	/// Actions that succeeded.
	pub succeeded: usize,
}

/// One failed cleanup action.
#[derive(Debug)]
pub struct CleanupFailure {
	/// Description given at registration.
	pub description: String,
	/// Failure returned by the action.
	pub error: BoxError,
}

/// Aggregate failure of a drain in which at least one action failed.
#[derive(Debug, ThisError)]
#[error("{} of {total} cleanup actions failed.", .failures.len())]
pub struct CleanupError {
	/// Actions executed.
	pub total: usize,
	/// Failed actions in execution order.
	pub failures: Vec<CleanupFailure>,
}
impl CleanupError {
	/// Descriptions of the failed actions in execution order.
	pub fn descriptions(&self) -> Vec<&str> {
		self.failures.iter().map(|f| f.description.as_str()).collect()
	}
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	let detail = payload
		.downcast_ref::<&str>()
		.map(|s| (*s).to_owned())
		.or_else(|| payload.downcast_ref::<String>().cloned())
		.unwrap_or_else(|| "<non-string payload>".into());

	format!("Cleanup action panicked: {detail}")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn recording(
		registry: &CleanupRegistry,
		log: &Arc<Mutex<Vec<&'static str>>>,
		name: &'static str,
		fail: bool,
	) {
		let log = log.clone();

		registry.register(name, move || async move {
			log.lock().push(name);

			if fail { Err::<(), BoxError>(format!("{name} exploded").into()) } else { Ok(()) }
		});
	}

	#[tokio::test]
	async fn drains_in_lifo_order() {
		let registry = CleanupRegistry::new();
		let log = Arc::new(Mutex::new(Vec::new()));

		recording(&registry, &log, "first", false);
		recording(&registry, &log, "second", false);
		recording(&registry, &log, "third", false);

		let report = registry.execute_all().await.expect("Every action should succeed.");

		assert_eq!(report, CleanupReport { total: 3, succeeded: 3 });
		assert_eq!(*log.lock(), ["third", "second", "first"]);
		assert!(registry.is_empty());
	}

	#[tokio::test]
	async fn failures_do_not_stop_the_drain() {
		let registry = CleanupRegistry::new();
		let log = Arc::new(Mutex::new(Vec::new()));

		recording(&registry, &log, "a", true);
		recording(&registry, &log, "b", false);
		recording(&registry, &log, "c", true);

		let err = registry.execute_all().await.expect_err("Two actions should fail.");

		assert_eq!(*log.lock(), ["c", "b", "a"]);
		assert_eq!(err.total, 3);
		assert_eq!(err.descriptions(), ["c", "a"]);
		assert_eq!(err.to_string(), "2 of 3 cleanup actions failed.");
		assert_eq!(err.failures[0].error.to_string(), "c exploded");
	}

	async fn explode() -> Result<(), BoxError> {
		panic!("teardown assertion failed")
	}

	#[tokio::test]
	async fn panicking_action_is_reported_and_the_drain_continues() {
		let registry = CleanupRegistry::new();
		let log = Arc::new(Mutex::new(Vec::new()));

		recording(&registry, &log, "first", false);
		registry.register("panicker", explode);
		recording(&registry, &log, "last", false);

		let err = registry.execute_all().await.expect_err("The panicking action should fail.");

		assert_eq!(*log.lock(), ["last", "first"]);
		assert!(registry.is_empty());
		assert_eq!(err.to_string(), "1 of 3 cleanup actions failed.");
		assert_eq!(err.descriptions(), ["panicker"]);
		assert_eq!(
			err.failures[0].error.to_string(),
			"Cleanup action panicked: teardown assertion failed"
		);
	}

	#[tokio::test]
	async fn actions_registered_mid_drain_also_run() {
		let registry = CleanupRegistry::new();
		let log = Arc::new(Mutex::new(Vec::new()));
		let inner_registry = registry.clone();
		let inner_log = log.clone();

		recording(&registry, &log, "outer", false);
		registry.register("spawner", move || async move {
			recording(&inner_registry, &inner_log, "late", false);

			Ok::<(), BoxError>(())
		});

		let report = registry.execute_all().await.expect("Every action should succeed.");

		assert_eq!(report.total, 3);
		assert_eq!(*log.lock(), ["late", "outer"]);
	}

	#[tokio::test]
	async fn empty_drain_and_clear() {
		let registry = CleanupRegistry::new();

		assert_eq!(
			registry.execute_all().await.expect("Empty drain should succeed."),
			CleanupReport { total: 0, succeeded: 0 }
		);

		registry.register("never", || async { Ok::<(), BoxError>(()) });

		assert_eq!(registry.descriptions(), ["never"]);

		registry.clear();

		assert!(registry.is_empty());
	}
}
