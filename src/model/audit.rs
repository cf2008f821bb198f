//! Audit log payloads.

// self
use crate::_prelude::*;

/// One audit log entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuditLogResponse {
	/// Identifier.
	pub id: String,
	/// Acting user.
	pub user_id: Option<String>,
	/// Action label, e.g. `CREATE`.
	pub action: String,
	/// Entity type label, e.g. `USER`.
	pub entity_type: String,
	/// Affected entity identifier.
	pub entity_id: Option<String>,
	/// Free-form details.
	pub details: Option<String>,
	/// Event timestamp.
	pub timestamp: Option<String>,
}
