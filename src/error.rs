//! Harness-level error types shared across clients, the token cache, cleanup, and polling.

// self
use crate::{_prelude::*, config::ConfigError, data::CleanupError};

/// Harness-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error used for transport causes and cleanup action failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

const AUTH_BODY_LIMIT: usize = 2_000;
const SNIPPET_LIMIT: usize = 500;

/// Canonical harness error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The backend could not be reached (DNS, TCP, TLS, timeout).
	#[error("API connection failed: {method} {url}.")]
	Connection {
		/// HTTP method of the failed request.
		method: &'static str,
		/// Fully resolved request URL.
		url: String,
		/// Underlying transport failure.
		#[source]
		source: BoxError,
	},
	/// The health check at execution start failed.
	#[error("API is not available at {base_url}. Start the API before running tests.")]
	ApiNotAvailable {
		/// Configured backend base URL.
		base_url: String,
		/// Underlying health-check failure.
		#[source]
		source: BoxError,
	},
	/// The backend answered with a status the caller did not expect.
	#[error("Unexpected API response: {method} {endpoint} returned HTTP {status}.")]
	UnexpectedResponse {
		/// HTTP method of the request.
		method: &'static str,
		/// Endpoint path.
		endpoint: String,
		/// Observed HTTP status.
		status: u16,
		/// Request body, when one was sent.
		request_body: Option<String>,
		/// Response body, when one was received.
		response_body: Option<String>,
	},
	/// Login for a credential identity failed.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// JSON (de)serialization failed.
	#[error("Failed to {direction} {type_name}.")]
	Serialization {
		/// Whether the harness was encoding or decoding.
		direction: Direction,
		/// Rust type involved.
		type_name: &'static str,
		/// Truncated JSON payload, when available.
		snippet: Option<String>,
		/// Underlying serde failure.
		#[source]
		source: BoxError,
	},
	/// A response body violated its JSON schema.
	#[error("Schema validation failed for {endpoint} against {schema}.")]
	SchemaValidation {
		/// Schema name or path.
		schema: String,
		/// Endpoint or status line the body came from.
		endpoint: String,
		/// Human-readable violations.
		violations: Vec<String>,
	},
	/// Mailpit never reported a message for the recipient.
	#[error("No email received for {recipient} within {timeout_seconds} seconds.")]
	MailTimeout {
		/// Recipient address that was polled for.
		recipient: String,
		/// Mailpit base URL.
		mailpit_url: String,
		/// Poll budget in seconds.
		timeout_seconds: u64,
		/// Last HTTP status observed while polling (0 if none).
		last_status: u16,
	},
	/// A reset e-mail arrived without a recognizable token.
	#[error("Reset token was not present in the e-mail body for {recipient}.")]
	MissingResetToken {
		/// Recipient address of the e-mail.
		recipient: String,
	},
	/// One or more cleanup actions failed.
	#[error(transparent)]
	Cleanup(#[from] CleanupError),
}
impl Error {
	/// Stable variant label used in detailed messages and logs.
	pub const fn kind(&self) -> &'static str {
		match self {
			Self::Config(_) => "ConfigError",
			Self::Connection { .. } => "ConnectionError",
			Self::ApiNotAvailable { .. } => "ApiNotAvailable",
			Self::UnexpectedResponse { .. } => "UnexpectedResponse",
			Self::Authentication(_) => "AuthenticationError",
			Self::Serialization { .. } => "SerializationError",
			Self::SchemaValidation { .. } => "SchemaValidationError",
			Self::MailTimeout { .. } => "MailTimeout",
			Self::MissingResetToken { .. } => "MissingResetToken",
			Self::Cleanup(_) => "CleanupError",
		}
	}

	/// Returns ordered key/value diagnostics describing the failure.
	pub fn context(&self) -> Vec<(&'static str, String)> {
		let mut ctx = Vec::new();

		match self {
			Self::Config(e) =>
				if let Some(file) = e.file() {
					ctx.push(("fileName", file.to_owned()));
				},
			Self::Connection { method, url, .. } => {
				ctx.push(("method", (*method).to_owned()));
				ctx.push(("url", url.clone()));
				ctx.push((
					"suggestion",
					"Verify the API is running and accessible at the configured base URL".into(),
				));
			},
			Self::ApiNotAvailable { base_url, .. } => {
				ctx.push(("baseUrl", base_url.clone()));
				ctx.push(("healthEndpoint", format!("{base_url}/actuator/health")));
				ctx.push(("suggestion", "Start the API before running the suite".into()));
			},
			Self::UnexpectedResponse { method, endpoint, status, request_body, response_body } => {
				ctx.push(("method", (*method).to_owned()));
				ctx.push(("endpoint", endpoint.clone()));
				ctx.push(("httpStatus", status.to_string()));

				if let Some(body) = request_body {
					ctx.push(("requestBody", body.clone()));
				}
				if let Some(body) = response_body {
					ctx.push(("responseBody", body.clone()));
				}
			},
			Self::Authentication(e) => e.push_context(&mut ctx),
			Self::Serialization { direction, type_name, snippet, .. } => {
				ctx.push(("direction", direction.label().to_owned()));
				ctx.push(("type", (*type_name).to_owned()));

				if let Some(snippet) = snippet {
					ctx.push(("jsonSnippet", snippet.clone()));
				}
			},
			Self::SchemaValidation { schema, endpoint, violations } => {
				ctx.push(("schemaPath", schema.clone()));
				ctx.push(("endpoint", endpoint.clone()));
				ctx.push(("violations", violations.join("; ")));
			},
			Self::MailTimeout { recipient, mailpit_url, timeout_seconds, last_status } => {
				ctx.push(("recipient", recipient.clone()));
				ctx.push(("mailpitUrl", mailpit_url.clone()));
				ctx.push(("timeoutSeconds", timeout_seconds.to_string()));
				ctx.push(("lastStatusCode", last_status.to_string()));
				ctx.push((
					"suggestion",
					format!(
						"Check that Mailpit is running at {mailpit_url} and the application is sending emails"
					),
				));
			},
			Self::MissingResetToken { recipient } => ctx.push(("recipient", recipient.clone())),
			Self::Cleanup(e) => {
				ctx.push(("totalActions", e.total.to_string()));
				ctx.push(("failedCount", e.failures.len().to_string()));
				ctx.push(("failedDescriptions", e.descriptions().join(", ")));
			},
		}

		ctx
	}

	/// Renders a multi-line report: label, message, timestamp, context, and cause chain.
	pub fn detailed_message(&self) -> String {
		let mut out = format!("[{}] {self}\n", self.kind());
		let now = OffsetDateTime::now_utc()
			.format(&time::format_description::well_known::Rfc3339)
			.unwrap_or_default();

		out.push_str(&format!("Timestamp: {now}\n"));

		let ctx = self.context();

		if !ctx.is_empty() {
			out.push_str("Context:\n");

			for (key, value) in ctx {
				out.push_str(&format!("  {key}: {value}\n"));
			}
		}

		let mut cause = StdError::source(self);

		while let Some(err) = cause {
			out.push_str(&format!("Cause: {err}\n"));
			cause = err.source();
		}

		out
	}

	pub(crate) fn serialize<E>(type_name: &'static str, source: E) -> Self
	where
		E: 'static + Send + Sync + StdError,
	{
		Self::Serialization {
			direction: Direction::Serialize,
			type_name,
			snippet: None,
			source: Box::new(source),
		}
	}

	pub(crate) fn deserialize<E>(type_name: &'static str, json: &str, source: E) -> Self
	where
		E: 'static + Send + Sync + StdError,
	{
		Self::Serialization {
			direction: Direction::Deserialize,
			type_name,
			snippet: Some(truncate(json, SNIPPET_LIMIT)),
			source: Box::new(source),
		}
	}
}

/// Direction of a failed serde operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Rust value to JSON.
	Serialize,
	/// JSON to Rust value.
	Deserialize,
}
impl Direction {
	/// Returns a stable upper-case label.
	pub const fn label(self) -> &'static str {
		match self {
			Self::Serialize => "SERIALIZE",
			Self::Deserialize => "DESERIALIZE",
		}
	}
}
impl Display for Direction {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Serialize => f.write_str("serialize"),
			Self::Deserialize => f.write_str("deserialize"),
		}
	}
}

/// Failures raised while acquiring a bearer token.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// The login endpoint answered with a non-200 status.
	#[error("Authentication failed for {email}: HTTP {status}.")]
	Rejected {
		/// Credential identity.
		email: String,
		/// HTTP status returned by the login endpoint.
		status: u16,
		/// Truncated response body.
		body: Option<String>,
	},
	/// The login request never produced a response.
	#[error("Authentication failed for {email}.")]
	Transport {
		/// Credential identity.
		email: String,
		/// Underlying failure.
		#[source]
		source: BoxError,
	},
	/// The login response lacked an access token.
	#[error("Authentication response for {email} is missing {field}.")]
	MalformedResponse {
		/// Credential identity.
		email: String,
		/// Missing or invalid field.
		field: &'static str,
	},
}
impl AuthenticationError {
	pub(crate) fn rejected(email: &str, status: u16, body: &str) -> Self {
		let body = if body.is_empty() { None } else { Some(truncate(body, AUTH_BODY_LIMIT)) };

		Self::Rejected { email: email.to_owned(), status, body }
	}

	/// Credential identity the failure belongs to.
	pub fn email(&self) -> &str {
		match self {
			Self::Rejected { email, .. }
			| Self::Transport { email, .. }
			| Self::MalformedResponse { email, .. } => email,
		}
	}

	fn push_context(&self, ctx: &mut Vec<(&'static str, String)>) {
		ctx.push(("email", self.email().to_owned()));

		match self {
			Self::Rejected { status, body, .. } => {
				ctx.push(("httpStatus", status.to_string()));

				if let Some(body) = body {
					ctx.push(("responseBody", body.clone()));
				}
			},
			Self::MalformedResponse { field, .. } => ctx.push(("field", (*field).to_owned())),
			Self::Transport { .. } => {},
		}
	}
}

/// Truncates `value` to `max` characters, appending a marker when shortened.
pub(crate) fn truncate(value: &str, max: usize) -> String {
	match value.char_indices().nth(max) {
		Some((idx, _)) => format!("{}...(truncated)", &value[..idx]),
		None => value.to_owned(),
	}
}
