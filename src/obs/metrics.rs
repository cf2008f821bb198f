// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::{OpKind, OpOutcome};

const KINDS: usize = 4;
const OUTCOMES: usize = 4;

static OUTCOME_TALLY: [AtomicU64; KINDS * OUTCOMES] =
	[const { AtomicU64::new(0) }; KINDS * OUTCOMES];

/// Records an operation outcome.
///
/// Every call bumps the in-process tally read by [`outcome_count`] and emits a `trace` event;
/// with the `metrics` feature it also increments `sc_api_harness_op_total`.
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	OUTCOME_TALLY[slot(kind, outcome)].fetch_add(1, Ordering::Relaxed);

	tracing::trace!(op = kind.as_str(), outcome = outcome.as_str(), "Operation outcome recorded.");

	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sc_api_harness_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}
}

/// Number of `outcome`s recorded for `kind` since process start.
pub fn outcome_count(kind: OpKind, outcome: OpOutcome) -> u64 {
	OUTCOME_TALLY[slot(kind, outcome)].load(Ordering::Relaxed)
}

fn slot(kind: OpKind, outcome: OpOutcome) -> usize {
	let kind = match kind {
		OpKind::TokenAcquire => 0,
		OpKind::Cleanup => 1,
		OpKind::MailPoll => 2,
		OpKind::HealthCheck => 3,
	};
	let outcome = match outcome {
		OpOutcome::Attempt => 0,
		OpOutcome::CacheHit => 1,
		OpOutcome::Success => 2,
		OpOutcome::Failure => 3,
	};

	kind * OUTCOMES + outcome
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn outcomes_are_tallied_per_operation() {
		let polls = outcome_count(OpKind::MailPoll, OpOutcome::Failure);
		let cleanups = outcome_count(OpKind::Cleanup, OpOutcome::Failure);

		record_op_outcome(OpKind::MailPoll, OpOutcome::Failure);
		record_op_outcome(OpKind::MailPoll, OpOutcome::Failure);

		// Other tests may record concurrently, so only lower bounds hold.
		assert!(outcome_count(OpKind::MailPoll, OpOutcome::Failure) >= polls + 2);
		assert!(outcome_count(OpKind::Cleanup, OpOutcome::Failure) >= cleanups);
	}

	#[test]
	fn every_pair_has_its_own_slot() {
		let kinds = [OpKind::TokenAcquire, OpKind::Cleanup, OpKind::MailPoll, OpKind::HealthCheck];
		let outcomes =
			[OpOutcome::Attempt, OpOutcome::CacheHit, OpOutcome::Success, OpOutcome::Failure];
		let mut slots = kinds
			.iter()
			.flat_map(|&k| outcomes.iter().map(move |&o| slot(k, o)))
			.collect::<Vec<_>>();

		slots.sort_unstable();
		slots.dedup();

		assert_eq!(slots, (0..KINDS * OUTCOMES).collect::<Vec<_>>());
	}
}
