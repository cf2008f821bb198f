//! Project payloads.

// self
use crate::_prelude::*;

/// `POST /projects` and `PUT /projects/{id}` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
	/// Project name.
	pub name: String,
	/// Free-form description.
	pub description: String,
}

/// Project resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProjectResponse {
	/// Identifier.
	pub id: String,
	/// Project name.
	pub name: String,
	/// Description.
	pub description: Option<String>,
	/// Creation timestamp.
	pub created_at: Option<String>,
	/// Last update timestamp.
	pub updated_at: Option<String>,
}
