// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use sc_api_harness::{
	Harness,
	assert::{
		assert_body_not_empty, assert_json_pointer, assert_json_pointer_contains,
		assert_json_pointer_not_null, assert_status, assert_status_and_content_type,
	},
	config::{Endpoint, HarnessConfig},
	data::TestDataFactory,
	error::Error,
	model::{LoginRequest, PageResponse, ProblemDetail, UpdateTierRequest, UserResponse},
	url::Url,
};

fn build_harness(server: &MockServer) -> Harness {
	let mut config = HarnessConfig::default();

	config.base_url = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	config.timeout_ms = 5_000;

	Harness::new(config).expect("Harness should build from a valid config.")
}

#[tokio::test]
async fn bearer_and_json_headers_are_sent() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(Endpoint::USER_ME)
				.header("authorization", "Bearer user-token")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").json_body(json!({
				"id": "u-1",
				"email": "me@sc.kpi.ua",
				"firstName": "Olena",
				"capabilityTier": 1
			}));
		})
		.await;
	let response =
		build_harness(&server).users().me(Some("user-token")).await.expect("Request should succeed.");

	assert_status_and_content_type(&response, 200, "APPLICATION/JSON");
	assert_json_pointer(&response, "/email", "me@sc.kpi.ua");
	assert_json_pointer_not_null(&response, "/id");
	assert_json_pointer_contains(&response, "/firstName", "len");
	assert_body_not_empty(&response);

	let user: UserResponse = response.json().expect("User payload should deserialize.");

	assert_eq!(user.first_name.as_deref(), Some("Olena"));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn refresh_and_cookie_auth_use_cookies() {
	let server = MockServer::start_async().await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_REFRESH).header("cookie", "refresh_token=r-1");
			then.status(200)
				.header("set-cookie", "access_token=a-2; Path=/; HttpOnly; SameSite=Strict");
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path(Endpoint::AUTH_ME).header("cookie", "access_token=a-2");
			then.status(200).json_body(json!({ "email": "me@sc.kpi.ua" }));
		})
		.await;
	let auth = build_harness(&server).auth();
	let refreshed = auth.refresh("r-1").await.expect("Refresh should succeed.");
	let cookie = refreshed.set_cookie("access_token").expect("Access cookie should be set.");

	assert!(cookie.has("HttpOnly"));
	assert_eq!(cookie.attribute("SameSite"), Some("Strict"));

	let response = auth.me_with_cookie(&cookie.value).await.expect("Cookie auth should succeed.");

	assert_status(&response, 200);

	refresh.assert_calls_async(1).await;
	me.assert_calls_async(1).await;
}

#[tokio::test]
async fn oauth_redirects_are_not_followed() {
	let server = MockServer::start_async().await;
	let redirect = server
		.mock_async(|when, then| {
			when.method(GET).path(Endpoint::AUTH_OAUTH2_GOOGLE);
			then.status(302).header("location", "https://accounts.google.com/o/oauth2/v2/auth");
		})
		.await;
	let callback = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(Endpoint::AUTH_OAUTH2_CALLBACK_GOOGLE)
				.query_param("code", "c-1")
				.query_param("state", "s-1")
				.header("cookie", "oauth_state=s-1");
			then.status(302).header("location", "/dashboard");
		})
		.await;
	let auth = build_harness(&server).auth();
	let response = auth.google_oauth_redirect().await.expect("Redirect request should succeed.");

	assert_eq!(response.status(), 302);
	assert!(response.header("location").is_some_and(|l| l.contains("accounts.google.com")));

	let response = auth
		.google_oauth_callback("c-1", "s-1", Some("s-1"))
		.await
		.expect("Callback request should succeed.");

	assert_eq!(response.status(), 302);

	redirect.assert_calls_async(1).await;
	callback.assert_calls_async(1).await;
}

#[tokio::test]
async fn raw_and_content_type_variants_reach_the_backend() {
	let server = MockServer::start_async().await;
	let raw = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_LOGIN).body("{invalid");
			then.status(400);
		})
		.await;
	let text = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_REGISTER).header("content-type", "text/plain");
			then.status(415);
		})
		.await;
	let auth = build_harness(&server).auth();

	assert_status(&auth.login_raw("{invalid").await.expect("Raw login should send."), 400);
	assert_status(
		&auth
			.register_with_content_type(&TestDataFactory::valid_register_request(), Some("text/plain"))
			.await
			.expect("Register should send."),
		415,
	);

	raw.assert_calls_async(1).await;
	text.assert_calls_async(1).await;
}

#[tokio::test]
async fn query_filters_and_nested_paths() {
	let server = MockServer::start_async().await;
	let audit = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(Endpoint::AUDIT_LOGS)
				.query_param("entityType", "USER")
				.query_param("action", "CREATE");
			then.status(200).json_body(json!({
				"content": [{ "id": "a-1", "action": "CREATE", "entityType": "USER" }],
				"page": 0,
				"size": 20,
				"totalElements": 1,
				"totalPages": 1,
				"first": true,
				"last": true
			}));
		})
		.await;
	let tier = server
		.mock_async(|when, then| {
			when.method(PATCH).path("/api/v1/users/u-7/tier").json_body(json!({ "tier": 3 }));
			then.status(200);
		})
		.await;
	let members = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/departments/d-1/members");
			then.status(200).json_body(json!([]));
		})
		.await;
	let harness = build_harness(&server);
	let page: PageResponse<serde_json::Value> = harness
		.audit()
		.list_filtered("USER", "CREATE", Some("admin"))
		.await
		.expect("Audit request should succeed.")
		.json()
		.expect("Audit page should deserialize.");

	assert_eq!(page.total_elements, 1);
	assert!(page.first && page.last);

	harness
		.users()
		.update_tier("u-7", &UpdateTierRequest { tier: 3 }, Some("admin"))
		.await
		.expect("Tier update should send.");
	harness.departments().members("d-1", None).await.expect("Members request should send.");

	audit.assert_calls_async(1).await;
	tier.assert_calls_async(1).await;
	members.assert_calls_async(1).await;
}

#[tokio::test]
async fn problem_details_validate_and_deserialize() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_LOGIN);
			then.status(400).header("content-type", "application/problem+json").json_body(json!({
				"type": "about:blank",
				"title": "Bad Request",
				"status": 400,
				"detail": "Validation failed",
				"errors": { "email": "must be a well-formed email address" }
			}));
		})
		.await;
	let harness = build_harness(&server);
	let response = harness
		.auth()
		.login(&LoginRequest::new("invalid-email", ""))
		.await
		.expect("Login request should send.");

	harness.schemas().validate_problem_detail(&response).expect("Body should be a problem detail.");

	let problem: ProblemDetail = response.json().expect("Problem detail should deserialize.");

	assert_eq!(problem.status, 400);
	assert!(problem.properties.contains_key("errors"));

	let err = harness
		.schemas()
		.validate_health(&response)
		.expect_err("A problem detail is not a health document.");

	assert!(matches!(err, Error::SchemaValidation { .. }));

	let err = response.expect_status(200).expect_err("A 400 is not a 200.");

	assert!(matches!(err, Error::UnexpectedResponse { status: 400, .. }));
}

#[tokio::test]
async fn unreachable_backend_is_a_connection_error() {
	let mut config = HarnessConfig::default();

	config.base_url = Url::parse("http://127.0.0.1:9").expect("Static URL should parse.");

	let harness = Harness::new(config).expect("Harness should build.");
	let err = harness.clubs().list(None).await.expect_err("Nothing listens on the discard port.");

	assert!(matches!(&err, Error::Connection { method: "GET", url, .. } if url == "http://127.0.0.1:9/api/v1/clubs"));
}
