//! Club payloads.

// self
use crate::_prelude::*;

/// `POST /clubs` and `PUT /clubs/{id}` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClubRequest {
	/// Club name.
	pub name: String,
	/// Free-form description.
	pub description: String,
}

/// Club resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClubResponse {
	/// Identifier.
	pub id: String,
	/// Club name.
	pub name: String,
	/// Description.
	pub description: Option<String>,
	/// Creation timestamp.
	pub created_at: Option<String>,
	/// Last update timestamp.
	pub updated_at: Option<String>,
}
