//! `/api/v1/notifications/settings` client.

// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
	model::NotificationSettingsRequest,
};

/// Notification settings endpoints.
#[derive(Clone, Debug)]
pub struct NotificationSettingsClient {
	api: ApiClient,
}
impl NotificationSettingsClient {
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `GET /notifications/settings`.
	pub async fn get(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(Endpoint::NOTIFICATION_SETTINGS, token).await
	}

	/// `PUT /notifications/settings`.
	pub async fn update(
		&self,
		request: &NotificationSettingsRequest,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api.put(Endpoint::NOTIFICATION_SETTINGS, request, token).await
	}
}
