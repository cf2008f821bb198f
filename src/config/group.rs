//! Test group labels and include/exclude selection.

// self
use crate::_prelude::*;

/// Namespace for test group labels.
#[derive(Clone, Copy, Debug)]
pub struct TestGroup;
impl TestGroup {
	/// Fast availability checks.
	pub const SMOKE: &'static str = "smoke";
	/// Full regression.
	pub const REGRESSION: &'static str = "regression";
	/// Happy-path cases.
	pub const POSITIVE: &'static str = "positive";
	/// Error-path cases.
	pub const NEGATIVE: &'static str = "negative";
	/// JSON schema checks.
	pub const SCHEMA: &'static str = "schema";
	/// Authorization and hardening checks.
	pub const SECURITY: &'static str = "security";
	/// Unsupported-verb checks.
	pub const METHOD_NOT_ALLOWED: &'static str = "method_not_allowed";
	/// Request validation checks.
	pub const VALIDATION: &'static str = "validation";
	/// Latency checks.
	pub const PERFORMANCE: &'static str = "performance";
	/// Response contract checks.
	pub const CONTRACT: &'static str = "contract";
	/// Harness self-tests.
	pub const FRAMEWORK: &'static str = "framework";
}

/// Include/exclude selection over test group labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupFilter {
	include: BTreeSet<String>,
	exclude: BTreeSet<String>,
}
impl GroupFilter {
	/// Builds a filter from comma-separated include/exclude lists.
	pub fn new(include: Option<&str>, exclude: Option<&str>) -> Self {
		Self { include: parse_groups(include), exclude: parse_groups(exclude) }
	}

	/// Reads `SC_INCLUDE_GROUPS` / `SC_EXCLUDE_GROUPS` through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		Self::new(lookup("SC_INCLUDE_GROUPS").as_deref(), lookup("SC_EXCLUDE_GROUPS").as_deref())
	}

	/// Returns `true` when neither list constrains selection.
	pub fn is_unrestricted(&self) -> bool {
		self.include.is_empty() && self.exclude.is_empty()
	}

	/// Decides whether a test tagged with `groups` runs; exclusion wins over inclusion.
	pub fn selects<'a, I>(&self, groups: I) -> bool
	where
		I: IntoIterator<Item = &'a str>,
	{
		let groups: Vec<&str> = groups.into_iter().collect();

		if groups.iter().any(|g| self.exclude.contains(*g)) {
			return false;
		}
		if !self.include.is_empty() && !groups.iter().any(|g| self.include.contains(*g)) {
			return false;
		}

		true
	}

	/// Keeps the items whose groups are selected, logging the tally.
	pub fn filter<T, F>(&self, items: Vec<T>, groups_of: F) -> Vec<T>
	where
		F: Fn(&T) -> &[&'static str],
	{
		if self.is_unrestricted() {
			return items;
		}

		let total = items.len();
		let selected: Vec<T> =
			items.into_iter().filter(|item| self.selects(groups_of(item).iter().copied())).collect();

		tracing::info!(selected = selected.len(), total, "Group filter applied.");

		selected
	}
}

fn parse_groups(raw: Option<&str>) -> BTreeSet<String> {
	raw.map(|raw| {
		raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned).collect()
	})
	.unwrap_or_default()
}
