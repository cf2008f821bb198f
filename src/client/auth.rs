//! `/api/v1/auth` client.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
	model::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
};

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";
/// Cookie carrying the OAuth state nonce.
pub const OAUTH_STATE_COOKIE: &str = "oauth_state";

/// Authentication endpoints.
#[derive(Clone, Debug)]
pub struct AuthClient {
	api: ApiClient,
}
impl AuthClient {
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `POST /auth/login`.
	pub async fn login(&self, request: &LoginRequest) -> Result<ApiResponse> {
		self.api.post(Endpoint::AUTH_LOGIN, request, None).await
	}

	/// `POST /auth/register`.
	pub async fn register(&self, request: &RegisterRequest) -> Result<ApiResponse> {
		self.api.post(Endpoint::AUTH_REGISTER, request, None).await
	}

	/// `POST /auth/refresh` authenticated by the refresh cookie.
	pub async fn refresh(&self, refresh_token: &str) -> Result<ApiResponse> {
		self.api
			.request(Method::POST, Endpoint::AUTH_REFRESH)
			.cookie(REFRESH_TOKEN_COOKIE, refresh_token)
			.send()
			.await
	}

	/// `POST /auth/logout`; `None` exercises the anonymous path.
	pub async fn logout(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.post_empty(Endpoint::AUTH_LOGOUT, token).await
	}

	/// `GET /auth/me` with a bearer token.
	pub async fn me(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(Endpoint::AUTH_ME, token).await
	}

	/// `GET /auth/me` authenticated by the access-token cookie.
	pub async fn me_with_cookie(&self, access_token: &str) -> Result<ApiResponse> {
		self.api
			.request(Method::GET, Endpoint::AUTH_ME)
			.cookie(ACCESS_TOKEN_COOKIE, access_token)
			.send()
			.await
	}

	/// `POST /auth/login` with a verbatim body.
	pub async fn login_raw(&self, raw: impl Into<String>) -> Result<ApiResponse> {
		self.api.post_raw(Endpoint::AUTH_LOGIN, raw).await
	}

	/// `POST /auth/register` with a verbatim body.
	pub async fn register_raw(&self, raw: impl Into<String>) -> Result<ApiResponse> {
		self.api.post_raw(Endpoint::AUTH_REGISTER, raw).await
	}

	/// `POST /auth/login` with a JSON body but an arbitrary `Content-Type` (or none).
	pub async fn login_with_content_type(
		&self,
		request: &LoginRequest,
		content_type: Option<&str>,
	) -> Result<ApiResponse> {
		self.api
			.request(Method::POST, Endpoint::AUTH_LOGIN)
			.json(request)?
			.content_type(content_type)
			.send()
			.await
	}

	/// `POST /auth/register` with a JSON body but an arbitrary `Content-Type` (or none).
	pub async fn register_with_content_type(
		&self,
		request: &RegisterRequest,
		content_type: Option<&str>,
	) -> Result<ApiResponse> {
		self.api
			.request(Method::POST, Endpoint::AUTH_REGISTER)
			.json(request)?
			.content_type(content_type)
			.send()
			.await
	}

	/// `POST /auth/forgot-password`.
	pub async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<ApiResponse> {
		self.api.post(Endpoint::AUTH_FORGOT_PASSWORD, request, None).await
	}

	/// `POST /auth/forgot-password` with a verbatim body.
	pub async fn forgot_password_raw(&self, raw: impl Into<String>) -> Result<ApiResponse> {
		self.api.post_raw(Endpoint::AUTH_FORGOT_PASSWORD, raw).await
	}

	/// `POST /auth/reset-password`.
	pub async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<ApiResponse> {
		self.api.post(Endpoint::AUTH_RESET_PASSWORD, request, None).await
	}

	/// `POST /auth/reset-password` with a verbatim body.
	pub async fn reset_password_raw(&self, raw: impl Into<String>) -> Result<ApiResponse> {
		self.api.post_raw(Endpoint::AUTH_RESET_PASSWORD, raw).await
	}

	/// `GET /auth/oauth2/google`; the `302` is returned as-is.
	pub async fn google_oauth_redirect(&self) -> Result<ApiResponse> {
		self.api.get(Endpoint::AUTH_OAUTH2_GOOGLE, None).await
	}

	/// `GET /auth/oauth2/callback/google?code=..&state=..` with an optional state cookie.
	pub async fn google_oauth_callback(
		&self,
		code: &str,
		state: &str,
		state_cookie: Option<&str>,
	) -> Result<ApiResponse> {
		let mut request = self
			.api
			.request(Method::GET, Endpoint::AUTH_OAUTH2_CALLBACK_GOOGLE)
			.query("code", code)
			.query("state", state);

		if let Some(cookie) = state_cookie {
			request = request.cookie(OAUTH_STATE_COOKIE, cookie);
		}

		request.send().await
	}
}
