//! Observability helpers for the harness core.
//!
//! # Feature Flags
//!
//! - Spans named `sc_api_harness.op` carry the `op` (component) and `stage` (call site) fields.
//! - [`outcome_count`] reads the in-process tally kept for every recorded outcome.
//! - Enable `metrics` to increment the `sc_api_harness_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod logging;
mod metrics;
mod span;

pub use logging::*;
pub use self::metrics::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Harness operations worth tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Bearer token acquisition through the login endpoint.
	TokenAcquire,
	/// Cleanup registry drain.
	Cleanup,
	/// Mailpit poll-wait.
	MailPoll,
	/// Health check at execution start.
	HealthCheck,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::TokenAcquire => "token_acquire",
			OpKind::Cleanup => "cleanup",
			OpKind::MailPoll => "mail_poll",
			OpKind::HealthCheck => "health_check",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Served from cache without a network call.
	CacheHit,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::CacheHit => "cache_hit",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
