//! Owner of the shared run state: config, transports, token cache, and cleanup registry.

// std
use std::path::Path;
// self
use crate::{
	_prelude::*,
	auth::{AuthContext, AuthManager, AuthRequirement, TokenSecret},
	client::{
		AuditClient, AuthClient, ClubClient, DepartmentClient, DocumentClient, MailpitClient,
		MailpitHelper, NotificationSettingsClient, ProjectClient, TelegramWebhookClient, UserClient,
	},
	config::HarnessConfig,
	data::{CLEANUP_TIER, CleanupRegistry, TestDataManager},
	http::ApiClient,
	lifecycle::{Execution, RetryPolicy},
	schema::SchemaValidator,
};

/// Shared, cheaply cloneable handle to everything a test run needs.
#[derive(Clone, Debug)]
pub struct Harness {
	config: Arc<HarnessConfig>,
	api: ApiClient,
	mail_api: ApiClient,
	tokens: AuthManager,
	cleanup: CleanupRegistry,
	schemas: Arc<SchemaValidator>,
}
impl Harness {
	/// Builds the harness from a resolved config.
	pub fn new(config: HarnessConfig) -> Result<Self> {
		let timeout = config.request_timeout();
		let api = ApiClient::new(config.base_url.clone(), timeout)?;
		let mail_api = ApiClient::new(config.mailpit.base_url.clone(), timeout)?;
		let tokens = AuthManager::from_config(api.clone(), &config);

		Ok(Self {
			config: Arc::new(config),
			api,
			mail_api,
			tokens,
			cleanup: CleanupRegistry::new(),
			schemas: Arc::new(SchemaValidator::bundled()?),
		})
	}

	/// Loads `application.yml` (plus profile overlay and env overrides) from `dir`.
	pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
		Self::new(HarnessConfig::load(dir)?)
	}

	/// Effective config.
	pub fn config(&self) -> &HarnessConfig {
		&self.config
	}

	/// Backend transport.
	pub fn api(&self) -> &ApiClient {
		&self.api
	}

	/// Token cache.
	pub fn tokens(&self) -> &AuthManager {
		&self.tokens
	}

	/// Cleanup registry.
	pub fn cleanup(&self) -> &CleanupRegistry {
		&self.cleanup
	}

	/// Bundled schema validator.
	pub fn schemas(&self) -> &SchemaValidator {
		&self.schemas
	}

	/// Resolves a requirement pair into credentials.
	pub fn auth_context(
		&self,
		method_level: Option<&AuthRequirement>,
		class_level: Option<&AuthRequirement>,
	) -> AuthContext {
		AuthContext::resolve(&self.config, method_level, class_level)
	}

	/// Bearer token for `context`, if it needs one.
	pub async fn token(&self, context: &AuthContext) -> Result<Option<TokenSecret>> {
		self.tokens.token(context).await
	}

	/// Bearer token for a configured tier; `None` when auth is off or the tier is unknown.
	pub async fn tier_token(&self, tier: &str) -> Result<Option<TokenSecret>> {
		self.token(&self.auth_context(Some(&AuthRequirement::tier(tier)), None)).await
	}

	/// `/auth` client.
	pub fn auth(&self) -> AuthClient {
		AuthClient::new(self.api.clone())
	}

	/// `/users` client.
	pub fn users(&self) -> UserClient {
		UserClient::new(self.api.clone())
	}

	/// `/clubs` client.
	pub fn clubs(&self) -> ClubClient {
		ClubClient::new(self.api.clone())
	}

	/// `/projects` client.
	pub fn projects(&self) -> ProjectClient {
		ProjectClient::new(self.api.clone())
	}

	/// `/documents` client.
	pub fn documents(&self) -> DocumentClient {
		DocumentClient::new(self.api.clone())
	}

	/// `/departments` client.
	pub fn departments(&self) -> DepartmentClient {
		DepartmentClient::new(self.api.clone())
	}

	/// `/notifications/settings` client.
	pub fn notifications(&self) -> NotificationSettingsClient {
		NotificationSettingsClient::new(self.api.clone())
	}

	/// Telegram webhook client.
	pub fn telegram_webhook(&self) -> TelegramWebhookClient {
		TelegramWebhookClient::new(self.api.clone())
	}

	/// `/admin/audit-logs` client.
	pub fn audit(&self) -> AuditClient {
		AuditClient::new(self.api.clone())
	}

	/// Mailpit client.
	pub fn mailpit(&self) -> MailpitClient {
		MailpitClient::new(self.mail_api.clone(), &self.config.mailpit)
	}

	/// Forgot-password helper.
	pub fn mailpit_helper(&self) -> MailpitHelper {
		MailpitHelper::new(self.auth(), self.mailpit())
	}

	/// Tracked user creation; deletes through the `admin` tier when one is configured.
	pub fn data_manager(&self) -> TestDataManager {
		let admin = self
			.config
			.auth
			.enabled
			.then(|| self.config.auth.tier_credentials.get(CLEANUP_TIER).cloned())
			.flatten();

		TestDataManager::new(
			self.auth(),
			self.users(),
			self.tokens.clone(),
			self.cleanup.clone(),
			admin,
		)
	}

	/// Start/finish hooks bound to this harness.
	pub fn execution(&self) -> Execution {
		Execution::new(self.config.clone(), self.cleanup.clone(), self.tokens.clone())
	}

	/// Fresh retry policy for one test.
	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy::from_config(&self.config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, auth::AuthSource};

	#[test]
	fn tier_contexts_resolve_from_config() {
		let harness = build_test_harness(test_config_with_tiers("http://127.0.0.1:9"));
		let ctx = harness.auth_context(Some(&AuthRequirement::tier("admin")), None);

		assert_eq!(ctx.source(), AuthSource::Config);
		assert_eq!(ctx.email(), Some("admin@sc.kpi.ua"));
		assert!(harness.schemas().contains(crate::schema::PROBLEM_DETAIL));
	}

	#[tokio::test]
	async fn disabled_auth_yields_no_tier_token() {
		let harness = build_test_harness(test_config("http://127.0.0.1:9"));
		let token = harness.tier_token("admin").await.expect("Disabled auth should not fail.");

		assert!(token.is_none());
		assert_eq!(harness.mailpit().base_url().as_str(), "http://127.0.0.1:9/");
	}
}
