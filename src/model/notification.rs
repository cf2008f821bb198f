//! Notification settings payload.

// self
use crate::_prelude::*;

/// `PUT /notifications/settings` body and `GET` response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NotificationSettingsRequest {
	/// E-mail channel.
	pub email_enabled: bool,
	/// Telegram channel.
	pub telegram_enabled: bool,
	/// Push channel.
	pub push_enabled: bool,
}
