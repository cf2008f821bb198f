//! Mailpit API payloads (PascalCase keys).

// self
use crate::_prelude::*;

/// `GET /api/v1/search` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailpitSearchResponse {
	/// Number of matching messages.
	pub messages_count: u64,
	/// Matching message summaries, newest first.
	pub messages: Vec<MessageSummary>,
}

/// Summary entry in a Mailpit search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSummary {
	/// Mailpit message identifier.
	#[serde(rename = "ID")]
	pub id: String,
	/// Subject line.
	#[serde(rename = "Subject")]
	pub subject: String,
	/// Receive timestamp.
	#[serde(rename = "Created")]
	pub created: String,
}

/// `GET /api/v1/message/{id}` response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailpitMessageResponse {
	/// Mailpit message identifier.
	#[serde(rename = "ID")]
	pub id: String,
	/// Subject line.
	#[serde(rename = "Subject")]
	pub subject: String,
	/// Plain-text body.
	#[serde(rename = "Text")]
	pub text: String,
	/// HTML body.
	#[serde(rename = "HTML")]
	pub html: String,
	/// Receive timestamp.
	#[serde(rename = "Created")]
	pub created: String,
}
