//! Telegram webhook client.

// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
};

/// Telegram bot webhook endpoint.
#[derive(Clone, Debug)]
pub struct TelegramWebhookClient {
	api: ApiClient,
}
impl TelegramWebhookClient {
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `POST /webhooks/telegram` with an arbitrary update payload.
	pub async fn send<P>(&self, payload: &P, token: Option<&str>) -> Result<ApiResponse>
	where
		P: ?Sized + Serialize,
	{
		self.api.post(Endpoint::TELEGRAM_WEBHOOK, payload, token).await
	}
}
