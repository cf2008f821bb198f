//! User management payloads.

// self
use crate::_prelude::*;

/// Admin `POST /users` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	/// Account e-mail.
	pub email: String,
	/// Initial password.
	pub password: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Capability tier level (0-5).
	pub tier: i32,
}

/// `PUT /users/{id}` and `PATCH /users/me` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateRequest {
	/// Given name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// Family name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
}

/// `PATCH /users/{id}/tier` body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTierRequest {
	/// Target tier level.
	pub tier: i32,
}

/// `PATCH /users/{id}/status` body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
	/// Whether the account is active.
	pub active: bool,
}

/// `POST /users/{id}/partner-levels` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPartnerLevelRequest {
	/// Partner organisation identifier.
	pub partner_id: String,
	/// Partnership level label.
	pub level: String,
}

/// `PATCH /users/me/password` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
	/// Password currently in use.
	pub current_password: String,
	/// Replacement password.
	pub new_password: String,
}

/// User resource.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserResponse {
	/// Identifier.
	pub id: String,
	/// E-mail.
	pub email: String,
	/// Given name.
	pub first_name: Option<String>,
	/// Family name.
	pub last_name: Option<String>,
	/// Tier as reported by the backend (number or label).
	pub capability_tier: Option<serde_json::Value>,
	/// Whether the account is active.
	pub active: Option<bool>,
	/// Creation timestamp.
	pub created_at: Option<String>,
	/// Last update timestamp.
	pub updated_at: Option<String>,
}
