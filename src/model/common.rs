//! Shared envelopes: pagination and RFC 9457 problem details.

// self
use crate::_prelude::*;

/// Spring-style page envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageResponse<T> {
	/// Items on this page.
	pub content: Vec<T>,
	/// Zero-based page index.
	pub page: u32,
	/// Page size.
	pub size: u32,
	/// Total matching items.
	pub total_elements: u64,
	/// Total page count.
	pub total_pages: u32,
	/// Whether this is the first page.
	pub first: bool,
	/// Whether this is the last page.
	pub last: bool,
}
impl<T> Default for PageResponse<T> {
	fn default() -> Self {
		Self {
			content: Vec::new(),
			page: 0,
			size: 0,
			total_elements: 0,
			total_pages: 0,
			first: false,
			last: false,
		}
	}
}

/// RFC 9457 problem detail body.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemDetail {
	/// Problem type URI.
	#[serde(rename = "type")]
	pub kind: Option<String>,
	/// Short summary.
	pub title: Option<String>,
	/// HTTP status.
	pub status: u16,
	/// Human-readable explanation.
	pub detail: Option<String>,
	/// Occurrence URI.
	pub instance: Option<String>,
	/// Extension members.
	#[serde(flatten)]
	pub properties: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn problem_detail_collects_extension_members() {
		let problem: ProblemDetail = serde_json::from_str(
			r#"{"type":"about:blank","title":"Bad Request","status":400,"errors":{"email":"invalid"}}"#,
		)
		.expect("Problem detail should deserialize.");

		assert_eq!(problem.status, 400);
		assert_eq!(problem.kind.as_deref(), Some("about:blank"));
		assert_eq!(problem.properties["errors"]["email"], "invalid");
	}

	#[test]
	fn page_defaults_missing_fields() {
		let page: PageResponse<String> =
			serde_json::from_str(r#"{"content":["a"],"totalElements":1}"#)
				.expect("Page payload should deserialize.");

		assert_eq!(page.content, ["a"]);
		assert_eq!(page.total_elements, 1);
		assert!(!page.last);
	}
}
