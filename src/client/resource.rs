//! CRUD clients for clubs, projects, and documents.
//!
//! The three areas share one shape: list, create, fetch, replace, and delete on a collection
//! path. [`ResourceClient`] implements it once; the aliases pin the request type.

// std
use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	config::Endpoint,
	http::{ApiClient, ApiResponse},
	model::{ClubRequest, DocumentRequest, ProjectRequest},
};

/// `/api/v1/clubs` client.
pub type ClubClient = ResourceClient<ClubRequest>;
/// `/api/v1/projects` client.
pub type ProjectClient = ResourceClient<ProjectRequest>;
/// `/api/v1/documents` client.
pub type DocumentClient = ResourceClient<DocumentRequest>;

/// Collection path for a request body type.
pub trait Resource: Serialize {
	/// Collection path, e.g. `/api/v1/clubs`.
	const COLLECTION: &'static str;
}
impl Resource for ClubRequest {
	const COLLECTION: &'static str = Endpoint::CLUBS;
}
impl Resource for ProjectRequest {
	const COLLECTION: &'static str = Endpoint::PROJECTS;
}
impl Resource for DocumentRequest {
	const COLLECTION: &'static str = Endpoint::DOCUMENTS;
}

/// Generic list/create/get/update/delete client.
#[derive(Debug)]
pub struct ResourceClient<R> {
	api: ApiClient,
	_resource: PhantomData<fn() -> R>,
}
impl<R> ResourceClient<R>
where
	R: Resource,
{
	/// Wraps a transport client.
	pub fn new(api: ApiClient) -> Self {
		Self { api, _resource: PhantomData }
	}

	/// `GET <collection>`.
	pub async fn list(&self, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(R::COLLECTION, token).await
	}

	/// `POST <collection>`.
	pub async fn create(&self, request: &R, token: Option<&str>) -> Result<ApiResponse> {
		self.api.post(R::COLLECTION, request, token).await
	}

	/// `GET <collection>/{id}`.
	pub async fn by_id(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.api.get(&Endpoint::by_id(R::COLLECTION, id), token).await
	}

	/// `PUT <collection>/{id}`.
	pub async fn update(&self, id: &str, request: &R, token: Option<&str>) -> Result<ApiResponse> {
		self.api.put(&Endpoint::by_id(R::COLLECTION, id), request, token).await
	}

	/// `DELETE <collection>/{id}`.
	pub async fn delete(&self, id: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.api.delete(&Endpoint::by_id(R::COLLECTION, id), token).await
	}
}
impl<R> Clone for ResourceClient<R> {
	fn clone(&self) -> Self {
		Self { api: self.api.clone(), _resource: PhantomData }
	}
}
