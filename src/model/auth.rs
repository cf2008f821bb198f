//! Authentication payloads.

// self
use crate::_prelude::*;

/// `POST /auth/login` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
	/// Login e-mail.
	pub email: String,
	/// Plain-text password.
	pub password: String,
}
impl LoginRequest {
	/// Creates a login body.
	pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
		Self { email: email.into(), password: password.into() }
	}
}

/// `POST /auth/register` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
	/// Account e-mail.
	pub email: String,
	/// Plain-text password.
	pub password: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
}
impl RegisterRequest {
	/// Login body for the same credentials.
	pub fn login(&self) -> LoginRequest {
		LoginRequest::new(&self.email, &self.password)
	}
}

/// Successful login payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TokenResponse {
	/// Bearer access token.
	pub access_token: Option<String>,
	/// Refresh token, when issued in the body.
	pub refresh_token: Option<String>,
	/// Lifetime in seconds.
	pub expires_in: Option<i64>,
	/// Token type label (usually `Bearer`).
	pub token_type: Option<String>,
}

/// `POST /auth/forgot-password` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgotPasswordRequest {
	/// Account e-mail.
	pub email: String,
}

/// `POST /auth/reset-password` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
	/// Token extracted from the reset e-mail.
	pub token: String,
	/// Replacement password.
	pub new_password: String,
}
