//! `/api/v1/users` client.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
	model::{
		AssignPartnerLevelRequest, ChangePasswordRequest, CreateUserRequest, UpdateStatusRequest,
		UpdateTierRequest, UserUpdateRequest,
	},
};

const PARTNER_LEVELS: &str = "partner-levels";

/// User management endpoints.
#[derive(Clone, Debug)]
pub struct UserClient {
	api: ApiClient,
}
impl UserClient {
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `GET /users`.
	pub async fn list(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(Endpoint::USERS, token).await
	}

	/// `GET /users?k=v..` for search and paging filters.
	pub async fn list_filtered<'a, I>(&self, filters: I, token: Option<&str>) -> Result<ApiResponse>
	where
		I: IntoIterator<Item = (&'a str, &'a str)>,
	{
		self.api.request(Method::GET, Endpoint::USERS).bearer(token).queries(filters).send().await
	}

	/// `GET /users/{id}`.
	pub async fn by_id(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(&Endpoint::by_id(Endpoint::USERS, id), token).await
	}

	/// `GET /users/me`.
	pub async fn me(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(Endpoint::USER_ME, token).await
	}

	/// `PUT /users/{id}`.
	pub async fn update(
		&self,
		id: &str,
		request: &UserUpdateRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.put(&Endpoint::by_id(Endpoint::USERS, id), request, token).await
	}

	/// `DELETE /users/{id}`.
	pub async fn delete(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.api.delete(&Endpoint::by_id(Endpoint::USERS, id), token).await
	}

	/// `POST /users` (admin).
	pub async fn create(
		&self,
		request: &CreateUserRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.post(Endpoint::USERS, request, token).await
	}

	/// `PATCH /users/{id}/tier`.
	pub async fn update_tier(
		&self,
		id: &str,
		request: &UpdateTierRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.patch(&Endpoint::nested(Endpoint::USERS, id, "tier"), request, token).await
	}

	/// `PATCH /users/{id}/status`.
	pub async fn update_status(
		&self,
		id: &str,
		request: &UpdateStatusRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.patch(&Endpoint::nested(Endpoint::USERS, id, "status"), request, token).await
	}

	/// `POST /users/{id}/partner-levels`.
	pub async fn assign_partner_level(
		&self,
		id: &str,
		request: &AssignPartnerLevelRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.post(&Endpoint::nested(Endpoint::USERS, id, PARTNER_LEVELS), request, token).await
	}

	/// `DELETE /users/{id}/partner-levels/{partner_id}`.
	pub async fn remove_partner_level(
		&self,
		id: &str,
		partner_id: &str,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		let path =
			Endpoint::by_id(&Endpoint::nested(Endpoint::USERS, id, PARTNER_LEVELS), partner_id);

		self.api.delete(&path, token).await
	}

	/// `PATCH /users/me/password`.
	pub async fn change_password(
		&self,
		request: &ChangePasswordRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.patch(Endpoint::USER_ME_PASSWORD, request, token).await
	}

	/// `PATCH /users/me`.
	pub async fn update_self(
		&self,
		request: &UserUpdateRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.patch(Endpoint::USER_ME, request, token).await
	}
}
