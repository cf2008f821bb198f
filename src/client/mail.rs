//! Mailpit capture-service client and the password-reset helper built on it.

// std
use std::sync::LazyLock;
// crates.io
use regex::Regex;
use reqwest::Method;
use tokio::time::{self as tokio_time, Instant};
// self
use crate::{
	_prelude::*,
	client::AuthClient,
	config::{Endpoint, MailpitConfig},
	http::{ApiClient, ApiResponse},
	model::{ForgotPasswordRequest, MailpitMessageResponse, MailpitSearchResponse},
	obs::{self, OpKind, OpOutcome, OpSpan},
};

const SEARCH: &str = "/api/v1/search";
const MESSAGE: &str = "/api/v1/message";
const MESSAGES: &str = "/api/v1/messages";

static RESET_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new("token=([a-f0-9-]+)").expect("Reset token pattern should compile.")
});

/// Unauthenticated client for the Mailpit REST API.
#[derive(Clone, Debug)]
pub struct MailpitClient {
	api: ApiClient,
	timeout: std::time::Duration,
	poll_interval: std::time::Duration,
}
impl MailpitClient {
	/// Builds a client from the Mailpit config section.
	pub fn new(api: ApiClient, config: &MailpitConfig) -> Self {
		Self { api, timeout: config.timeout(), poll_interval: config.poll_interval() }
	}

	/// Mailpit base URL.
	pub fn base_url(&self) -> &Url {
		self.api.base_url()
	}

	/// `GET /api/v1/search?query=to:<recipient>`.
	pub async fn search_messages(&self, recipient: &str) -> Result<ApiResponse> {
		self.api.request(Method::GET, SEARCH).query("query", format!("to:{recipient}")).send().await
	}

	/// Typed variant of [`MailpitClient::search_messages`].
	pub async fn search_messages_typed(&self, recipient: &str) -> Result<MailpitSearchResponse> {
		self.search_messages(recipient).await?.json()
	}

	/// `GET /api/v1/message/{id}`.
	pub async fn get_message(&self, id: &str) -> Result<ApiResponse> {
		self.api.get(&Endpoint::by_id(MESSAGE, id), None).await
	}

	/// Typed variant of [`MailpitClient::get_message`].
	pub async fn get_message_typed(&self, id: &str) -> Result<MailpitMessageResponse> {
		self.get_message(id).await?.json()
	}

	/// `DELETE /api/v1/messages`.
	pub async fn delete_all_messages(&self) -> Result<ApiResponse> {
		self.api.delete(MESSAGES, None).await
	}

	/// Polls with the configured timeout; see [`MailpitClient::wait_for_message_within`].
	pub async fn wait_for_message(&self, recipient: &str) -> Result<ApiResponse> {
		self.wait_for_message_within(recipient, self.timeout).await
	}

	/// Typed variant of [`MailpitClient::wait_for_message`].
	pub async fn wait_for_message_typed(&self, recipient: &str) -> Result<MailpitSearchResponse> {
		self.wait_for_message(recipient).await?.json()
	}

	/// Searches for `recipient` immediately and then every poll interval until a `200` response
	/// reports at least one message, or `timeout` elapses.
	///
	/// Transport failures count as "not yet". On timeout the error carries the last HTTP
	/// status observed (`0` when no poll got an answer).
	pub async fn wait_for_message_within(
		&self,
		recipient: &str,
		timeout: std::time::Duration,
	) -> Result<ApiResponse> {
		const KIND: OpKind = OpKind::MailPoll;

		let span = OpSpan::new(KIND, "wait_for_message");

		obs::record_op_outcome(KIND, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let deadline = Instant::now() + timeout;
				let mut last_status = 0;
				let mut polls = 0_u32;

				loop {
					polls += 1;

					match tokio_time::timeout_at(deadline, self.search_messages(recipient)).await {
						Ok(Ok(response)) => {
							last_status = response.status();

							if last_status == 200 && messages_count(&response) > 0 {
								tracing::info!(recipient, polls, "Mailpit message arrived.");

								return Ok(response);
							}
						},
						Ok(Err(e)) => {
							tracing::debug!(recipient, error = %e, "Mailpit poll failed.");
						},
						Err(_) => break,
					}

					let now = Instant::now();

					if now >= deadline {
						break;
					}

					tokio_time::sleep_until((now + self.poll_interval).min(deadline)).await;
				}

				tracing::warn!(recipient, polls, last_status, "Mailpit wait timed out.");

				Err(Error::MailTimeout {
					recipient: recipient.to_owned(),
					mailpit_url: self.base_url().as_str().trim_end_matches('/').to_owned(),
					timeout_seconds: u64::try_from(timeout.as_millis().div_ceil(1_000))
						.unwrap_or(u64::MAX),
					last_status,
				})
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(KIND, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(KIND, OpOutcome::Failure),
		}

		result
	}
}

/// Drives the forgot-password flow end to end through Mailpit.
#[derive(Clone, Debug)]
pub struct MailpitHelper {
	auth: AuthClient,
	mailpit: MailpitClient,
}
impl MailpitHelper {
	/// Pairs an auth client with a Mailpit client.
	pub fn new(auth: AuthClient, mailpit: MailpitClient) -> Self {
		Self { auth, mailpit }
	}

	/// Requests a reset for `email`, waits for the mail, and extracts its token.
	pub async fn request_reset_token(&self, email: &str) -> Result<String> {
		self.auth.forgot_password(&ForgotPasswordRequest { email: email.to_owned() }).await?;

		let search = self.mailpit.wait_for_message_typed(email).await?;
		let Some(first) = search.messages.first() else {
			return Err(Error::MissingResetToken { recipient: email.to_owned() });
		};
		let message = self.mailpit.get_message_typed(&first.id).await?;

		extract_reset_token(&message.text)
			.ok_or_else(|| Error::MissingResetToken { recipient: email.to_owned() })
	}
}

/// Returns the first `token=<hex-uuid>` value in `body`.
pub fn extract_reset_token(body: &str) -> Option<String> {
	RESET_TOKEN.captures(body).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_owned())
}

fn messages_count(response: &ApiResponse) -> u64 {
	response.json_pointer("/messages_count").and_then(|v| v.as_u64()).unwrap_or(0)
}
