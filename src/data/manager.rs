//! Registers users through the API and schedules their deletion.

// self
use crate::{
	_prelude::*,
	auth::AuthManager,
	client::{AuthClient, UserClient},
	config::TierCredentials,
	data::{CleanupRegistry, TestDataFactory},
	error::BoxError,
	http::ApiResponse,
	model::RegisterRequest,
};

/// Tier whose credentials are used to delete tracked users.
pub const CLEANUP_TIER: &str = "admin";

/// Creates backend state and records how to undo it.
#[derive(Clone, Debug)]
pub struct TestDataManager {
	auth: AuthClient,
	users: UserClient,
	tokens: AuthManager,
	cleanup: CleanupRegistry,
	admin: Option<TierCredentials>,
}
impl TestDataManager {
	/// Wires the manager; `admin` enables real deletion of tracked users.
	pub fn new(
		auth: AuthClient,
		users: UserClient,
		tokens: AuthManager,
		cleanup: CleanupRegistry,
		admin: Option<TierCredentials>,
	) -> Self {
		Self { auth, users, tokens, cleanup, admin }
	}

	/// Registers `request` and, on `200`/`201` with an `id`, schedules the user's deletion.
	pub async fn register_user_and_track(&self, request: &RegisterRequest) -> Result<ApiResponse> {
		let response = self.auth.register(request).await?;

		if !matches!(response.status(), 200 | 201) {
			return Ok(response);
		}

		let Some(id) = response.json_pointer("/id").and_then(|id| match id {
			serde_json::Value::String(s) => Some(s),
			serde_json::Value::Number(n) => Some(n.to_string()),
			_ => None,
		}) else {
			return Ok(response);
		};
		let users = self.users.clone();
		let tokens = self.tokens.clone();
		let admin = self.admin.clone();
		let email = request.email.clone();

		self.cleanup.register(format!("Delete user: {}", request.email), move || {
			delete_tracked_user(users, tokens, admin, id, email)
		});

		Ok(response)
	}

	/// Registers a random valid user with tracking and returns its credentials.
	pub async fn create_and_register_user(&self) -> Result<RegisterRequest> {
		let request = TestDataFactory::valid_register_request();

		self.register_user_and_track(&request).await?;

		Ok(request)
	}

	/// Registry the manager schedules into.
	pub fn cleanup(&self) -> &CleanupRegistry {
		&self.cleanup
	}
}

async fn delete_tracked_user(
	users: UserClient,
	tokens: AuthManager,
	admin: Option<TierCredentials>,
	id: String,
	email: String,
) -> Result<(), BoxError> {
	let Some(admin) = admin else {
		tracing::info!(user_id = %id, email = %email, "No admin tier configured; user left in place.");

		return Ok(());
	};
	let token = tokens.token_for(&admin.email, &admin.password).await?;
	let deleted = users.delete(&id, Some(token.expose())).await?;

	match deleted.status() {
		200 | 204 | 404 => Ok(()),
		_ => Err(deleted.unexpected().into()),
	}
}
