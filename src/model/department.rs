//! Department payloads.

// self
use crate::_prelude::*;

/// Department resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepartmentResponse {
	/// Identifier.
	pub id: String,
	/// Department name.
	pub name: String,
	/// Description.
	pub description: Option<String>,
	/// Creation timestamp.
	pub created_at: Option<String>,
	/// Last update timestamp.
	pub updated_at: Option<String>,
}
