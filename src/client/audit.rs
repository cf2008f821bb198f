//! `/api/v1/admin/audit-logs` client.

// crates.io
use reqwest::Method;
// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
};

/// Audit log endpoints.
#[derive(Clone, Debug)]
pub struct AuditClient {
	api: ApiClient,
}
impl AuditClient {
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `GET /admin/audit-logs`.
	pub async fn list(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(Endpoint::AUDIT_LOGS, token).await
	}

	/// `GET /admin/audit-logs?entityType=..&action=..`.
	pub async fn list_filtered(
		&self,
		entity_type: &str,
		action: &str,
		token: Option<&str>,
	) -> Result<ApiResponse> {
		self.api
			.request(Method::GET, Endpoint::AUDIT_LOGS)
			.bearer(token)
			.query("entityType", entity_type)
			.query("action", action)
			.send()
			.await
	}
}
