//! Token cache keyed by credential identity with per-identity single-flight logins.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{AuthContext, CachedToken, TokenSecret},
	client::{ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
	config::HarnessConfig,
	error::AuthenticationError,
	http::ApiClient,
	model::{LoginRequest, TokenResponse},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

/// Caches bearer tokens per e-mail and logs in at most once per identity at a time.
///
/// Readers hit the cache without touching the flight guards; misses serialize per identity so
/// concurrent tests sharing one account trigger a single login.
#[derive(Clone, Debug)]
pub struct AuthManager {
	api: ApiClient,
	token_endpoint: String,
	cache: Arc<RwLock<HashMap<String, CachedToken>>>,
	flight_guards: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
	metrics: Arc<AuthMetrics>,
}
impl AuthManager {
	/// Creates a manager that logs in through `api` at `token_endpoint`.
	pub fn new(api: ApiClient, token_endpoint: impl Into<String>) -> Self {
		Self {
			api,
			token_endpoint: token_endpoint.into(),
			cache: Default::default(),
			flight_guards: Default::default(),
			metrics: Default::default(),
		}
	}

	/// Creates a manager using the configured login endpoint.
	pub fn from_config(api: ApiClient, config: &HarnessConfig) -> Self {
		Self::new(api, &config.auth.token_endpoint)
	}

	/// Returns a bearer token for `context`, or `None` for anonymous contexts.
	pub async fn token(&self, context: &AuthContext) -> Result<Option<TokenSecret>> {
		match (context.is_enabled(), context.email(), context.password()) {
			(true, Some(email), Some(password)) => self.token_for(email, password).await.map(Some),
			_ => Ok(None),
		}
	}

	/// Returns a cached or freshly issued bearer token for the identity.
	pub async fn token_for(&self, email: &str, password: &str) -> Result<TokenSecret> {
		const KIND: OpKind = OpKind::TokenAcquire;

		if let Some(token) = self.cached(email) {
			self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);
			obs::record_op_outcome(KIND, OpOutcome::CacheHit);

			return Ok(token);
		}

		let span = OpSpan::new(KIND, "token_for");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result: Result<TokenSecret> = span
			.instrument(async move {
				let guard = self.flight_guard(email);
				let _singleflight = guard.lock().await;

				if let Some(token) = self.cached(email) {
					self.metrics.cache_hits.fetch_add(1, Ordering::Relaxed);

					return Ok(token);
				}

				let entry = self.login(email, password).await?;
				let token = entry.access_token.clone();

				self.cache.write().insert(email.to_owned(), entry);

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => {
				self.metrics.failures.fetch_add(1, Ordering::Relaxed);
				obs::record_op_outcome(KIND, OpOutcome::Failure);
			},
		}

		result
	}

	/// Drops every cached token.
	pub fn clear_cache(&self) {
		let mut cache = self.cache.write();
		let dropped = cache.len();

		cache.clear();

		tracing::debug!(dropped, "Token cache cleared.");
	}

	/// Drops the cached token for one identity; returns whether one was present.
	pub fn invalidate(&self, email: &str) -> bool {
		self.cache.write().remove(email).is_some()
	}

	/// Refresh token cached for `email`, for driving the cookie-based refresh endpoint.
	pub fn refresh_token(&self, email: &str) -> Option<TokenSecret> {
		self.cache.read().get(email)?.refresh_token.clone()
	}

	/// Number of cached identities, expired ones included.
	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	/// Whether the cache holds no identities.
	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}

	/// Counter snapshot.
	pub fn metrics(&self) -> AuthMetricsSnapshot {
		self.metrics.snapshot()
	}

	fn cached(&self, email: &str) -> Option<TokenSecret> {
		let cache = self.cache.read();
		let entry = cache.get(email)?;

		(!entry.is_expired()).then(|| entry.access_token.clone())
	}

	fn flight_guard(&self, email: &str) -> Arc<AsyncMutex<()>> {
		let mut guards = self.flight_guards.lock();

		guards.entry(email.to_owned()).or_insert_with(|| Arc::new(AsyncMutex::new(()))).clone()
	}

	async fn login(&self, email: &str, password: &str) -> Result<CachedToken> {
		tracing::info!(email, endpoint = %self.token_endpoint, "Logging in.");

		self.metrics.logins.fetch_add(1, Ordering::Relaxed);

		let issued_at = OffsetDateTime::now_utc();
		let response = self
			.api
			.post(&self.token_endpoint, &LoginRequest::new(email, password), None)
			.await
			.map_err(|e| AuthenticationError::Transport {
				email: email.to_owned(),
				source: Box::new(e),
			})?;

		if response.status() != 200 {
			tracing::warn!(email, status = response.status(), "Login rejected.");

			return Err(AuthenticationError::rejected(email, response.status(), response.text()).into());
		}

		// Cookie-only logins may answer with an empty or non-JSON body.
		let body = response.json::<TokenResponse>().ok();
		let cookie_token = response.cookie(ACCESS_TOKEN_COOKIE);

		if body.is_none() && cookie_token.is_none() {
			return Err(AuthenticationError::MalformedResponse {
				email: email.to_owned(),
				field: "body",
			}
			.into());
		}

		let body = body.unwrap_or_default();
		let access_token = body
			.access_token
			.filter(|token| !token.is_empty())
			.or(cookie_token)
			.ok_or_else(|| AuthenticationError::MalformedResponse {
				email: email.to_owned(),
				field: "accessToken",
			})?;
		let refresh_token = body.refresh_token.or_else(|| response.cookie(REFRESH_TOKEN_COOKIE));
		let entry = CachedToken::from_lifetime(
			access_token,
			refresh_token,
			body.expires_in.unwrap_or(0),
			issued_at,
		);

		tracing::info!(
			email,
			token = %entry.access_token.fingerprint(),
			expires_at = %entry.expires_at,
			"Token cached."
		);

		Ok(entry)
	}
}

/// Monotonic counters describing cache behavior.
#[derive(Debug, Default)]
pub struct AuthMetrics {
	logins: AtomicU64,
	cache_hits: AtomicU64,
	failures: AtomicU64,
}
impl AuthMetrics {
	/// Reads all counters.
	pub fn snapshot(&self) -> AuthMetricsSnapshot {
		AuthMetricsSnapshot {
			logins: self.logins.load(Ordering::Relaxed),
			cache_hits: self.cache_hits.load(Ordering::Relaxed),
			failures: self.failures.load(Ordering::Relaxed),
		}
	}
}

/// Point-in-time copy of [`AuthMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AuthMetricsSnapshot {
	/// Login requests sent.
	pub logins: u64,
	/// Requests served from cache.
	pub cache_hits: u64,
	/// Failed acquisitions.
	pub failures: u64,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn manager() -> AuthManager {
		let api = ApiClient::with_client(
			ReqwestClient::new(),
			Url::parse("http://127.0.0.1:9").expect("Static URL should parse."),
		);

		AuthManager::new(api, "/api/v1/auth/login")
	}

	#[tokio::test]
	async fn disabled_context_yields_no_token() {
		let token = manager()
			.token(&AuthContext::disabled())
			.await
			.expect("Disabled context should not fail.");

		assert!(token.is_none());
	}

	#[test]
	fn cache_bookkeeping() {
		let manager = manager();

		manager.cache.write().insert(
			"a@sc.kpi.ua".into(),
			CachedToken::from_lifetime("t", None, 3_600, OffsetDateTime::now_utc()),
		);

		assert_eq!(manager.len(), 1);
		assert_eq!(manager.cached("a@sc.kpi.ua").map(|t| t.expose().to_owned()), Some("t".into()));
		assert!(manager.refresh_token("a@sc.kpi.ua").is_none());
		assert!(manager.invalidate("a@sc.kpi.ua"));
		assert!(!manager.invalidate("a@sc.kpi.ua"));
		assert!(manager.is_empty());
	}

	#[test]
	fn expired_entries_are_not_served() {
		let manager = manager();

		manager.cache.write().insert(
			"a@sc.kpi.ua".into(),
			CachedToken::from_lifetime("t", None, 10, OffsetDateTime::now_utc()),
		);

		assert!(manager.cached("a@sc.kpi.ua").is_none());
	}

	#[test]
	fn flight_guards_are_shared_per_identity() {
		let manager = manager();
		let a = manager.flight_guard("a@sc.kpi.ua");
		let b = manager.flight_guard("a@sc.kpi.ua");
		let c = manager.flight_guard("c@sc.kpi.ua");

		assert!(Arc::ptr_eq(&a, &b));
		assert!(!Arc::ptr_eq(&a, &c));
	}
}
