//! Backend endpoint paths.

/// Namespace for backend endpoint path constants.
#[derive(Clone, Copy, Debug)]
pub struct Endpoint;
impl Endpoint {
	/// Auth root.
	pub const AUTH: &'static str = "/api/v1/auth";
	/// `POST` login.
	pub const AUTH_LOGIN: &'static str = "/api/v1/auth/login";
	/// `POST` register.
	pub const AUTH_REGISTER: &'static str = "/api/v1/auth/register";
	/// `POST` refresh via cookie.
	pub const AUTH_REFRESH: &'static str = "/api/v1/auth/refresh";
	/// `POST` logout.
	pub const AUTH_LOGOUT: &'static str = "/api/v1/auth/logout";
	/// `GET` current principal.
	pub const AUTH_ME: &'static str = "/api/v1/auth/me";
	/// `POST` forgot password.
	pub const AUTH_FORGOT_PASSWORD: &'static str = "/api/v1/auth/forgot-password";
	/// `POST` reset password.
	pub const AUTH_RESET_PASSWORD: &'static str = "/api/v1/auth/reset-password";
	/// `GET` Google OAuth redirect.
	pub const AUTH_OAUTH2_GOOGLE: &'static str = "/api/v1/auth/oauth2/google";
	/// `GET` Google OAuth callback.
	pub const AUTH_OAUTH2_CALLBACK_GOOGLE: &'static str = "/api/v1/auth/oauth2/callback/google";

	/// Users collection.
	pub const USERS: &'static str = "/api/v1/users";
	/// Current user.
	pub const USER_ME: &'static str = "/api/v1/users/me";
	/// Current user's password.
	pub const USER_ME_PASSWORD: &'static str = "/api/v1/users/me/password";

	/// Clubs collection.
	pub const CLUBS: &'static str = "/api/v1/clubs";
	/// Projects collection.
	pub const PROJECTS: &'static str = "/api/v1/projects";
	/// Departments collection.
	pub const DEPARTMENTS: &'static str = "/api/v1/departments";
	/// Documents collection.
	pub const DOCUMENTS: &'static str = "/api/v1/documents";

	/// Notification settings for the current user.
	pub const NOTIFICATION_SETTINGS: &'static str = "/api/v1/notifications/settings";
	/// Telegram bot webhook.
	pub const TELEGRAM_WEBHOOK: &'static str = "/api/v1/webhooks/telegram";
	/// Admin audit log.
	pub const AUDIT_LOGS: &'static str = "/api/v1/admin/audit-logs";

	/// Actuator health endpoint.
	pub const HEALTH: &'static str = "/actuator/health";
	/// Swagger UI page.
	pub const SWAGGER_UI: &'static str = "/swagger-ui.html";
	/// OpenAPI document.
	pub const API_DOCS: &'static str = "/v3/api-docs";

	/// Joins a collection path with an identifier, percent-encoding the identifier as one segment.
	pub fn by_id(collection: &str, id: impl AsRef<str>) -> String {
		format!("{}/{}", collection.trim_end_matches('/'), urlencoding::encode(id.as_ref()))
	}

	/// Joins a collection path, an identifier, and a trailing segment.
	pub fn nested(collection: &str, id: impl AsRef<str>, segment: &str) -> String {
		format!("{}/{}", Self::by_id(collection, id), segment.trim_start_matches('/'))
	}
}
