//! `/api/v1/departments` client (read-only).

// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
};

/// Department endpoints.
#[derive(Clone, Debug)]
pub struct DepartmentClient {
	api: ApiClient,
}
impl DepartmentClient {
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api }
	}

	/// `GET /departments`.
	pub async fn list(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(Endpoint::DEPARTMENTS, token).await
	}

	/// `GET /departments/{id}`.
	pub async fn by_id(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(&Endpoint::by_id(Endpoint::DEPARTMENTS, id), token).await
	}

	/// `GET /departments/{id}/members`.
	pub async fn members(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(&Endpoint::nested(Endpoint::DEPARTMENTS, id, "members"), token).await
	}
}
