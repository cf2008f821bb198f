//! Transport primitives shared by every backend client.
//!
//! [`ApiClient`] wraps a [`ReqwestClient`] bound to one base URL and hands out
//! [`ApiRequest`] builders. Every request resolves to an [`ApiResponse`] that owns the
//! status, headers, body, and elapsed time so tests can assert on them after the fact.
//! Transport failures surface as [`Error::Connection`] carrying the method and the
//! resolved URL; HTTP error statuses are *not* errors at this layer.

// std
use std::{ops::Deref, time::Instant};
// crates.io
use reqwest::{
	Method,
	header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, HeaderMap, RETRY_AFTER, SET_COOKIE},
	redirect::Policy,
};
use serde::de::DeserializeOwned;
use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, config::ConfigError};

const JSON: &str = "application/json";
const MASKED: &str = "***";

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are never followed: OAuth redirect endpoints are asserted on their raw
/// `302` response.
#[derive(Clone, Debug)]
pub struct ApiClient {
	client: ReqwestClient,
	base_url: Url,
}
impl ApiClient {
	/// Builds a client with the harness defaults (no redirects, request timeout).
	pub fn new(base_url: Url, timeout: std::time::Duration) -> Result<Self> {
		let client = ReqwestClient::builder()
			.redirect(Policy::none())
			.timeout(timeout)
			.build()
			.map_err(ConfigError::HttpClientBuild)?;

		Ok(Self::with_client(client, base_url))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, base_url: Url) -> Self {
		Self { client, base_url }
	}

	/// Base URL every path is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Resolves `path` against the base URL, keeping any base path prefix.
	pub fn url_for(&self, path: &str) -> String {
		format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path.trim_start_matches('/'))
	}

	/// Starts a request builder.
	pub fn request(&self, method: Method, path: impl Into<String>) -> ApiRequest {
		ApiRequest {
			client: self.clone(),
			method,
			path: path.into(),
			bearer: None,
			query: Vec::new(),
			cookies: Vec::new(),
			body: None,
			content_type: Some(JSON.into()),
		}
	}

	/// `GET path`, optionally authenticated.
	pub async fn get(&self, path: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.request(Method::GET, path).bearer(token).send().await
	}

	/// `POST path` with a JSON body, optionally authenticated.
	pub async fn post<B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(Method::POST, path).bearer(token).json(body)?.send().await
	}

	/// `PUT path` with a JSON body, optionally authenticated.
	pub async fn put<B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(Method::PUT, path).bearer(token).json(body)?.send().await
	}

	/// `PATCH path` with a JSON body, optionally authenticated.
	pub async fn patch<B>(&self, path: &str, body: &B, token: Option<&str>) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(Method::PATCH, path).bearer(token).json(body)?.send().await
	}

	/// `DELETE path`, optionally authenticated.
	pub async fn delete(&self, path: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.request(Method::DELETE, path).bearer(token).send().await
	}

	/// `POST path` with no body.
	pub async fn post_empty(&self, path: &str, token: Option<&str>) -> Result<ApiResponse> {
		self.request(Method::POST, path).bearer(token).send().await
	}

	/// `POST path` with a raw, possibly malformed, JSON body.
	pub async fn post_raw(&self, path: &str, raw: impl Into<String>) -> Result<ApiResponse> {
		self.request(Method::POST, path).raw(raw).send().await
	}
}
impl AsRef<ReqwestClient> for ApiClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Deref for ApiClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}

/// Request builder returned by [`ApiClient::request`].
#[derive(Debug)]
pub struct ApiRequest {
	client: ApiClient,
	method: Method,
	path: String,
	bearer: Option<String>,
	query: Vec<(String, String)>,
	cookies: Vec<(String, String)>,
	body: Option<String>,
	content_type: Option<String>,
}
impl ApiRequest {
	/// Attaches `Authorization: Bearer <token>` when a token is present.
	pub fn bearer(mut self, token: Option<&str>) -> Self {
		self.bearer = token.map(str::to_owned);

		self
	}

	/// Appends a query parameter.
	pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends several query parameters.
	pub fn queries<I, K, V>(mut self, pairs: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));

		self
	}

	/// Adds a request cookie.
	pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.cookies.push((name.into(), value.into()));

		self
	}

	/// Serializes `body` as JSON.
	pub fn json<B>(mut self, body: &B) -> Result<Self>
	where
		B: ?Sized + Serialize,
	{
		let encoded = serde_json::to_string(body)
			.map_err(|e| Error::serialize(std::any::type_name::<B>(), e))?;

		self.body = Some(encoded);

		Ok(self)
	}

	/// Sends `raw` verbatim as the body.
	pub fn raw(mut self, raw: impl Into<String>) -> Self {
		self.body = Some(raw.into());

		self
	}

	/// Overrides the `Content-Type` header; `None` omits it.
	pub fn content_type(mut self, value: Option<&str>) -> Self {
		self.content_type = value.map(str::to_owned);

		self
	}

	/// Executes the request.
	pub async fn send(self) -> Result<ApiResponse> {
		let url = self.client.url_for(&self.path);
		let method = method_label(&self.method);
		let mut builder = self.client.client.request(self.method.clone(), &url).header("Accept", JSON);

		if let Some(content_type) = &self.content_type {
			builder = builder.header(CONTENT_TYPE, content_type);
		}
		if let Some(token) = &self.bearer {
			builder = builder.bearer_auth(token);
		}
		if !self.query.is_empty() {
			builder = builder.query(&self.query);
		}
		if !self.cookies.is_empty() {
			let joined = self
				.cookies
				.iter()
				.map(|(k, v)| format!("{k}={v}"))
				.collect::<Vec<_>>()
				.join("; ");

			builder = builder.header(COOKIE, joined);
		}
		if let Some(body) = &self.body {
			builder = builder.body(body.clone());
		}

		let request = builder.build().map_err(|e| connection_error(method, &url, e))?;

		log_request(&request, self.body.as_deref());

		let started = Instant::now();
		let response = self
			.client
			.client
			.execute(request)
			.await
			.map_err(|e| connection_error(method, &url, e))?;
		let status = response.status();
		let headers = response.headers().to_owned();
		let bytes = response.bytes().await.map_err(|e| connection_error(method, &url, e))?;
		let elapsed = started.elapsed();

		tracing::debug!(
			method,
			path = %self.path,
			status = status.as_u16(),
			elapsed_ms = elapsed.as_millis() as u64,
			"Response received."
		);

		Ok(ApiResponse {
			method,
			path: self.path,
			request_body: self.body,
			status,
			headers,
			body: String::from_utf8_lossy(&bytes).into_owned(),
			elapsed,
		})
	}
}

/// Fully buffered response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	method: &'static str,
	path: String,
	request_body: Option<String>,
	status: StatusCode,
	headers: HeaderMap,
	body: String,
	elapsed: std::time::Duration,
}
impl ApiResponse {
	/// Numeric HTTP status.
	pub fn status(&self) -> u16 {
		self.status.as_u16()
	}

	/// Typed HTTP status.
	pub fn status_code(&self) -> StatusCode {
		self.status
	}

	/// HTTP method label of the originating request.
	pub fn method(&self) -> &'static str {
		self.method
	}

	/// Path of the originating request.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Raw body text.
	pub fn text(&self) -> &str {
		&self.body
	}

	/// Time between dispatch and the last body byte.
	pub fn elapsed(&self) -> std::time::Duration {
		self.elapsed
	}

	/// Response headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	/// First value of a header, if it is valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name)?.to_str().ok()
	}

	/// `Content-Type` header value.
	pub fn content_type(&self) -> Option<&str> {
		self.header(CONTENT_TYPE.as_str())
	}

	/// Value of a cookie set through `Set-Cookie`.
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.set_cookie(name).map(|attrs| attrs.value)
	}

	/// Parsed `Set-Cookie` entry for `name`, including its attributes.
	pub fn set_cookie(&self, name: &str) -> Option<SetCookie> {
		self.headers
			.get_all(SET_COOKIE)
			.iter()
			.filter_map(|value| value.to_str().ok())
			.filter_map(SetCookie::parse)
			.find(|cookie| cookie.name == name)
	}

	/// `Retry-After` hint as a relative duration.
	pub fn retry_after(&self) -> Option<Duration> {
		parse_retry_after(&self.headers)
	}

	/// Deserializes the body into `T`, reporting the failing JSON path.
	pub fn json<T>(&self) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_str(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|e| Error::deserialize(std::any::type_name::<T>(), &self.body, e))
	}

	/// Parses the body as an untyped JSON value.
	pub fn json_value(&self) -> Result<serde_json::Value> {
		self.json()
	}

	/// Looks up a JSON pointer (`/messages/0/ID`) in the body.
	pub fn json_pointer(&self, pointer: &str) -> Option<serde_json::Value> {
		serde_json::from_str::<serde_json::Value>(&self.body).ok()?.pointer(pointer).cloned()
	}

	/// Returns `self` when the status matches, else [`Error::UnexpectedResponse`].
	pub fn expect_status(self, expected: u16) -> Result<Self> {
		if self.status() == expected { Ok(self) } else { Err(self.unexpected()) }
	}

	/// Builds an [`Error::UnexpectedResponse`] describing this response.
	pub fn unexpected(&self) -> Error {
		Error::UnexpectedResponse {
			method: self.method,
			endpoint: self.path.clone(),
			status: self.status(),
			request_body: self.request_body.clone(),
			response_body: (!self.body.is_empty()).then(|| self.body.clone()),
		}
	}
}

/// One parsed `Set-Cookie` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetCookie {
	/// Cookie name.
	pub name: String,
	/// Cookie value.
	pub value: String,
	/// Lower-cased attribute names mapped to their values (empty for flags).
	pub attributes: BTreeMap<String, String>,
}
impl SetCookie {
	/// Parses `name=value; Attr=x; Flag`.
	pub fn parse(raw: &str) -> Option<Self> {
		let mut parts = raw.split(';').map(str::trim);
		let (name, value) = parts.next()?.split_once('=')?;
		let attributes = parts
			.filter(|p| !p.is_empty())
			.map(|p| match p.split_once('=') {
				Some((k, v)) => (k.trim().to_ascii_lowercase(), v.trim().to_owned()),
				None => (p.to_ascii_lowercase(), String::new()),
			})
			.collect();

		Some(Self { name: name.trim().to_owned(), value: value.trim().to_owned(), attributes })
	}

	/// Returns `true` when the flag or attribute is present (case-insensitive).
	pub fn has(&self, attribute: &str) -> bool {
		self.attributes.contains_key(&attribute.to_ascii_lowercase())
	}

	/// Attribute value (case-insensitive name).
	pub fn attribute(&self, attribute: &str) -> Option<&str> {
		self.attributes.get(&attribute.to_ascii_lowercase()).map(String::as_str)
	}
}

fn method_label(method: &Method) -> &'static str {
	match method.as_str() {
		"GET" => "GET",
		"POST" => "POST",
		"PUT" => "PUT",
		"PATCH" => "PATCH",
		"DELETE" => "DELETE",
		"HEAD" => "HEAD",
		"OPTIONS" => "OPTIONS",
		_ => "OTHER",
	}
}

fn connection_error(method: &'static str, url: &str, source: ReqwestError) -> Error {
	Error::Connection { method, url: url.to_owned(), source: Box::new(source) }
}

fn log_request(request: &reqwest::Request, body: Option<&str>) {
	tracing::debug!(method = %request.method(), url = %request.url(), "Request dispatched.");

	for (name, value) in request.headers() {
		let shown = if name == AUTHORIZATION { MASKED } else { value.to_str().unwrap_or("<binary>") };

		tracing::debug!(header = %name, value = shown, "Request header.");
	}

	if let Some(body) = body {
		tracing::debug!(body, "Request body.");
	}
}

fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return i64::try_from(secs).ok().map(Duration::seconds);
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn set_cookie_parses_flags_and_attributes() {
		let cookie = SetCookie::parse("access_token=abc.def; Path=/; HttpOnly; SameSite=Strict")
			.expect("Cookie header should parse.");

		assert_eq!(cookie.name, "access_token");
		assert_eq!(cookie.value, "abc.def");
		assert!(cookie.has("httponly"));
		assert_eq!(cookie.attribute("samesite"), Some("Strict"));
		assert!(!cookie.has("Secure"));
		assert!(SetCookie::parse("garbage").is_none());
	}

	#[test]
	fn url_for_preserves_base_prefix() {
		let client = ApiClient::with_client(
			ReqwestClient::new(),
			Url::parse("http://localhost:8080/prefix/").expect("Base URL should parse."),
		);

		assert_eq!(client.url_for("/api/v1/users"), "http://localhost:8080/prefix/api/v1/users");
	}

	#[test]
	fn retry_after_accepts_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(7)));
	}

	#[test]
	fn retry_after_rejects_out_of_range_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(
			RETRY_AFTER,
			HeaderValue::from_str(&u64::MAX.to_string()).expect("Digits form a valid header."),
		);

		assert_eq!(parse_retry_after(&headers), None);
	}

	#[test]
	fn method_labels_are_static() {
		assert_eq!(method_label(&Method::PATCH), "PATCH");
		assert_eq!(method_label(&Method::TRACE), "OTHER");
	}
}
