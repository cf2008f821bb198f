//! Resolution of per-test auth requirements into concrete credentials.

// self
use crate::{_prelude::*, config::HarnessConfig};

/// Where an [`AuthContext`] got its credentials from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthSource {
	/// No authentication.
	Disabled,
	/// Tier credentials from the harness config.
	Config,
	/// Credentials given directly on the requirement.
	Explicit,
}
impl AuthSource {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthSource::Disabled => "disabled",
			AuthSource::Config => "config",
			AuthSource::Explicit => "explicit",
		}
	}
}
impl Display for AuthSource {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Credentials a test runs with, or the absence of them.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthContext {
	enabled: bool,
	email: Option<String>,
	password: Option<String>,
	tier: Option<String>,
	source: AuthSource,
}
impl AuthContext {
	/// Anonymous context.
	pub fn disabled() -> Self {
		Self { enabled: false, email: None, password: None, tier: None, source: AuthSource::Disabled }
	}

	/// Context for a configured tier.
	pub fn for_tier(
		tier: impl Into<String>,
		email: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			enabled: true,
			email: Some(email.into()),
			password: Some(password.into()),
			tier: Some(tier.into()),
			source: AuthSource::Config,
		}
	}

	/// Context for explicit credentials.
	pub fn for_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self {
			enabled: true,
			email: Some(email.into()),
			password: Some(password.into()),
			tier: None,
			source: AuthSource::Explicit,
		}
	}

	/// Resolves the effective requirement against `config`.
	///
	/// The method-level requirement wins over the class-level one. Unknown tiers degrade to
	/// [`AuthContext::disabled`] with a warning.
	pub fn resolve(
		config: &HarnessConfig,
		method_level: Option<&AuthRequirement>,
		class_level: Option<&AuthRequirement>,
	) -> Self {
		if !config.auth.enabled {
			return Self::disabled();
		}

		let Some(requirement) = method_level.or(class_level) else {
			return Self::disabled();
		};

		if !requirement.enabled {
			return Self::disabled();
		}
		if !requirement.email.is_empty() && !requirement.password.is_empty() {
			return Self::for_credentials(&requirement.email, &requirement.password);
		}
		if let Some(credentials) = config.auth.tier_credentials.get(&requirement.tier) {
			return Self::for_tier(&requirement.tier, &credentials.email, &credentials.password);
		}

		tracing::warn!(tier = %requirement.tier, "No credentials configured for tier; running unauthenticated.");

		Self::disabled()
	}

	/// Whether a bearer token should be attached.
	pub fn is_enabled(&self) -> bool {
		self.enabled
	}

	/// Credential identity, if any.
	pub fn email(&self) -> Option<&str> {
		self.email.as_deref()
	}

	/// Password, if any. Callers must avoid logging this string.
	pub fn password(&self) -> Option<&str> {
		self.password.as_deref()
	}

	/// Tier name for config-sourced contexts.
	pub fn tier(&self) -> Option<&str> {
		self.tier.as_deref()
	}

	/// Credential source.
	pub fn source(&self) -> AuthSource {
		self.source
	}
}
impl Default for AuthContext {
	fn default() -> Self {
		Self::disabled()
	}
}
impl Debug for AuthContext {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthContext")
			.field("enabled", &self.enabled)
			.field("email", &self.email)
			.field("password", &self.password.as_ref().map(|_| "<redacted>"))
			.field("tier", &self.tier)
			.field("source", &self.source)
			.finish()
	}
}

/// Declarative auth requirement attached to a test or a test group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthRequirement {
	/// Whether the test needs a token at all.
	pub enabled: bool,
	/// Configured tier to log in as.
	pub tier: String,
	/// Explicit e-mail; overrides `tier` together with `password`.
	pub email: String,
	/// Explicit password.
	pub password: String,
}
impl AuthRequirement {
	/// Requirement for a configured tier.
	pub fn tier(tier: impl Into<String>) -> Self {
		Self { tier: tier.into(), ..Default::default() }
	}

	/// Requirement for explicit credentials.
	pub fn credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into(), ..Default::default() }
	}

	/// Requirement that opts out of authentication.
	pub fn none() -> Self {
		Self { enabled: false, ..Default::default() }
	}
}
impl Default for AuthRequirement {
	fn default() -> Self {
		Self { enabled: true, tier: "basic".into(), email: String::new(), password: String::new() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::config::TierCredentials;

	fn config(enabled: bool) -> HarnessConfig {
		let mut config = HarnessConfig::default();

		config.auth.enabled = enabled;
		config
			.auth
			.tier_credentials
			.insert("admin".into(), TierCredentials::new("admin@sc.kpi.ua", "Admin@123456"));

		config
	}

	#[test]
	fn globally_disabled_auth_wins() {
		let ctx = AuthContext::resolve(&config(false), Some(&AuthRequirement::tier("admin")), None);

		assert_eq!(ctx, AuthContext::disabled());
	}

	#[test]
	fn method_requirement_overrides_class_requirement() {
		let method = AuthRequirement::tier("admin");
		let class = AuthRequirement::none();
		let ctx = AuthContext::resolve(&config(true), Some(&method), Some(&class));

		assert_eq!(ctx.source(), AuthSource::Config);
		assert_eq!(ctx.tier(), Some("admin"));
		assert_eq!(ctx.email(), Some("admin@sc.kpi.ua"));

		let ctx = AuthContext::resolve(&config(true), None, Some(&class));

		assert!(!ctx.is_enabled());
	}

	#[test]
	fn explicit_credentials_beat_tiers() {
		let mut requirement = AuthRequirement::credentials("x@sc.kpi.ua", "Secret@1");

		requirement.tier = "admin".into();

		let ctx = AuthContext::resolve(&config(true), Some(&requirement), None);

		assert_eq!(ctx.source(), AuthSource::Explicit);
		assert_eq!(ctx.email(), Some("x@sc.kpi.ua"));
		assert_eq!(ctx.tier(), None);
	}

	#[test]
	fn missing_requirement_or_unknown_tier_disables() {
		assert!(!AuthContext::resolve(&config(true), None, None).is_enabled());
		assert!(
			!AuthContext::resolve(&config(true), Some(&AuthRequirement::tier("senior")), None)
				.is_enabled()
		);
	}

	#[test]
	fn debug_redacts_password() {
		let rendered = format!("{:?}", AuthContext::for_credentials("a@sc.kpi.ua", "Secret@1"));

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("Secret@1"));
	}
}
