//! Panicking assertion helpers for use inside tests.

// self
use crate::http::ApiResponse;

/// Asserts the HTTP status, echoing the body on mismatch.
#[track_caller]
pub fn assert_status(response: &ApiResponse, expected: u16) {
	assert_eq!(
		response.status(),
		expected,
		"Expected HTTP status {expected} but got {} for {} {}. Body: {}",
		response.status(),
		response.method(),
		response.path(),
		pretty_body(response),
	);
}

/// Asserts the `Content-Type` contains `expected`, ignoring case.
#[track_caller]
pub fn assert_content_type(response: &ApiResponse, expected: &str) {
	let actual = response.content_type().unwrap_or_default();

	assert!(
		actual.to_ascii_lowercase().contains(&expected.to_ascii_lowercase()),
		"Expected content type containing '{expected}' but was '{actual}'.",
	);
}

/// Asserts the response arrived in under `max_ms` milliseconds.
#[track_caller]
pub fn assert_response_time(response: &ApiResponse, max_ms: u64) {
	let elapsed = response.elapsed().as_millis() as u64;

	assert!(elapsed < max_ms, "Expected response time < {max_ms}ms but was {elapsed}ms.");
}

/// Asserts the value at a JSON pointer equals `expected`.
#[track_caller]
pub fn assert_json_pointer<V>(response: &ApiResponse, pointer: &str, expected: V)
where
	V: Into<serde_json::Value>,
{
	let expected = expected.into();
	let actual = response.json_pointer(pointer);

	assert_eq!(
		actual.as_ref(),
		Some(&expected),
		"Expected JSON pointer '{pointer}' to be '{expected}' but was '{}'.",
		actual.as_ref().map(ToString::to_string).unwrap_or_else(|| "<missing>".into()),
	);
}

/// Asserts the value at a JSON pointer is present and not `null`.
#[track_caller]
pub fn assert_json_pointer_not_null(response: &ApiResponse, pointer: &str) {
	assert!(
		response.json_pointer(pointer).is_some_and(|v| !v.is_null()),
		"Expected JSON pointer '{pointer}' to be not null.",
	);
}

/// Asserts the string form of the value at a JSON pointer contains `needle`.
#[track_caller]
pub fn assert_json_pointer_contains(response: &ApiResponse, pointer: &str, needle: &str) {
	let actual = match response.json_pointer(pointer) {
		Some(serde_json::Value::String(s)) => s,
		Some(other) => other.to_string(),
		None => String::new(),
	};

	assert!(
		actual.contains(needle),
		"Expected JSON pointer '{pointer}' to contain '{needle}' but was '{actual}'.",
	);
}

/// Asserts the body is not empty.
#[track_caller]
pub fn assert_body_not_empty(response: &ApiResponse) {
	assert!(!response.text().is_empty(), "Expected response body to not be empty.");
}

/// Asserts both status and content type.
#[track_caller]
pub fn assert_status_and_content_type(response: &ApiResponse, status: u16, content_type: &str) {
	assert_status(response, status);
	assert_content_type(response, content_type);
}

fn pretty_body(response: &ApiResponse) -> String {
	serde_json::from_str::<serde_json::Value>(response.text())
		.ok()
		.and_then(|v| serde_json::to_string_pretty(&v).ok())
		.unwrap_or_else(|| response.text().to_owned())
}
