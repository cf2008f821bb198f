//! Walks the password-reset flow end to end against a mocked backend and Mailpit: start-up
//! health check, tracked registration, reset e-mail capture, token extraction, and teardown.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use sc_api_harness::{
	Harness,
	config::{Endpoint, HarnessConfig},
	data::TestDataFactory,
	obs,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;
	obs::init_logging();

	let server = MockServer::start_async().await;
	let _health = server
		.mock_async(|when, then| {
			when.method(GET).path(Endpoint::HEALTH);
			then.status(200).json_body(json!({ "status": "UP" }));
		})
		.await;
	let _register = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_REGISTER);
			then.status(201).json_body(json!({ "id": "user-1" }));
		})
		.await;
	let _forgot = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_FORGOT_PASSWORD);
			then.status(200);
		})
		.await;
	let _search = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/search");
			then.status(200).json_body(json!({
				"messages_count": 1,
				"messages": [{ "ID": "m-1", "Subject": "Reset your password", "Created": "2025-01-01T00:00:00Z" }]
			}));
		})
		.await;
	let _message = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/message/m-1");
			then.status(200).json_body(json!({
				"ID": "m-1",
				"Subject": "Reset your password",
				"Text": "Open https://sc.kpi.ua/reset?token=5f0c2a9e-1b7d-4c3e-9a8f-0d6e2b4c1a7f",
				"HTML": "",
				"Created": "2025-01-01T00:00:00Z"
			}));
		})
		.await;
	let reset = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(Endpoint::AUTH_RESET_PASSWORD)
				.body_includes("5f0c2a9e-1b7d-4c3e-9a8f-0d6e2b4c1a7f");
			then.status(200);
		})
		.await;
	let mut config = HarnessConfig::default();
	let url = Url::parse(&server.base_url())?;

	config.base_url = url.clone();
	config.mailpit.base_url = url;
	config.mailpit.poll_interval_ms = 100;

	let harness = Harness::new(config)?;
	let execution = harness.execution().with_results_dir(std::env::temp_dir().join("sc-demo"));

	execution.start().await?;

	let user = harness.data_manager().create_and_register_user().await?;
	let token = harness.mailpit_helper().request_reset_token(&user.email).await?;
	let response = harness
		.auth()
		.reset_password(&TestDataFactory::valid_reset_password_request(&token))
		.await?
		.expect_status(200)?;

	println!("Reset token {token} accepted with HTTP {}.", response.status());

	reset.assert_async().await;

	if let Some(Err(e)) = execution.finish().await {
		println!("Cleanup reported: {e}.");
	}

	Ok(())
}
