//! Document payloads.

// self
use crate::_prelude::*;

/// `POST /documents` and `PUT /documents/{id}` body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRequest {
	/// Title.
	pub title: String,
	/// Body text.
	pub content: String,
	/// Document type label, e.g. `REPORT`.
	#[serde(rename = "type")]
	pub kind: String,
}

/// Document resource.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentResponse {
	/// Identifier.
	pub id: String,
	/// Title.
	pub title: String,
	/// Body text.
	pub content: Option<String>,
	/// Document type label.
	#[serde(rename = "type")]
	pub kind: Option<String>,
	/// Author identifier.
	pub created_by: Option<String>,
	/// Creation timestamp.
	pub created_at: Option<String>,
	/// Last update timestamp.
	pub updated_at: Option<String>,
}
