// std
use std::time::{Duration, Instant};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use sc_api_harness::{
	Harness,
	config::{Endpoint, HarnessConfig},
	error::Error,
	url::Url,
};

const RECIPIENT: &str = "reset@sc.kpi.ua";

fn build_harness(server: &MockServer, timeout_seconds: u64) -> Harness {
	let url = Url::parse(&server.base_url()).expect("Mock server URL should parse.");
	let mut config = HarnessConfig::default();

	config.base_url = url.clone();
	config.mailpit.base_url = url;
	config.mailpit.timeout_seconds = timeout_seconds;
	config.mailpit.poll_interval_ms = 50;

	Harness::new(config).expect("Harness should build from a valid config.")
}

fn search_body(count: u64) -> serde_json::Value {
	let messages = (0..count)
		.map(|i| json!({ "ID": format!("msg-{i}"), "Subject": "Password reset", "Created": "2025-01-01T00:00:00Z" }))
		.collect::<Vec<_>>();

	json!({ "total": count, "messages_count": count, "messages": messages })
}

#[tokio::test]
async fn wait_returns_first_matching_search() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/search").query_param("query", format!("to:{RECIPIENT}"));
			then.status(200).json_body(search_body(1));
		})
		.await;
	let search = build_harness(&server, 2)
		.mailpit()
		.wait_for_message_typed(RECIPIENT)
		.await
		.expect("Message should be found on the first poll.");

	assert_eq!(search.messages_count, 1);
	assert_eq!(search.messages[0].id, "msg-0");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn wait_keeps_polling_until_message_arrives() {
	let server = MockServer::start_async().await;
	let mailpit = build_harness(&server, 3).mailpit();
	let (result, _late) = tokio::join!(mailpit.wait_for_message(RECIPIENT), async {
		tokio::time::sleep(Duration::from_millis(200)).await;

		server
			.mock_async(|when, then| {
				when.method(GET).path("/api/v1/search");
				then.status(200).json_body(search_body(2));
			})
			.await
	});
	let response = result.expect("Message should be found once it arrives.");

	assert_eq!(response.status(), 200);
	assert_eq!(response.json_pointer("/messages_count"), Some(json!(2)));
}

#[tokio::test]
async fn empty_mailbox_times_out_with_last_status() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/search");
			then.status(200).json_body(search_body(0));
		})
		.await;
	let started = Instant::now();
	let err = build_harness(&server, 1)
		.mailpit()
		.wait_for_message(RECIPIENT)
		.await
		.expect_err("An empty mailbox should time out.");
	let elapsed = started.elapsed();

	let Error::MailTimeout { recipient, mailpit_url, timeout_seconds, last_status } = &err else {
		panic!("Expected a mail timeout, got {err:?}.");
	};

	assert_eq!(recipient, RECIPIENT);
	assert_eq!(mailpit_url, &server.base_url());
	assert_eq!(*timeout_seconds, 1);
	assert_eq!(*last_status, 200);
	assert!(elapsed >= Duration::from_secs(1));
	assert!(elapsed < Duration::from_secs(3));
	assert!(err.to_string().contains("within 1 seconds"));

	let calls = mock.calls_async().await;

	assert!(calls > 2, "Expected repeated polling, saw {calls} calls.");
}

#[tokio::test]
async fn failing_search_reports_its_status() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/search");
			then.status(503);
		})
		.await;
	let mailpit = build_harness(&server, 5).mailpit();
	let err = mailpit
		.wait_for_message_within(RECIPIENT, Duration::from_millis(300))
		.await
		.expect_err("A failing Mailpit should time out.");

	// Sub-second budgets round up so the report never claims a zero-second wait.
	assert!(matches!(err, Error::MailTimeout { last_status: 503, timeout_seconds: 1, .. }));
	assert!(err.to_string().contains("within 1 seconds"));
}

#[tokio::test]
async fn reset_token_is_extracted_from_the_mail() {
	let server = MockServer::start_async().await;
	let forgot = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(Endpoint::AUTH_FORGOT_PASSWORD)
				.json_body(json!({ "email": RECIPIENT }));
			then.status(200);
		})
		.await;
	let _search = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/search");
			then.status(200).json_body(search_body(1));
		})
		.await;
	let _message = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/message/msg-0");
			then.status(200).json_body(json!({
				"ID": "msg-0",
				"Subject": "Password reset",
				"Text": "Follow https://sc.kpi.ua/reset?token=0a1b2c3d-4e5f-6789-abcd-ef0123456789 to reset.",
				"HTML": "<p>reset</p>",
				"Created": "2025-01-01T00:00:00Z"
			}));
		})
		.await;
	let token = build_harness(&server, 2)
		.mailpit_helper()
		.request_reset_token(RECIPIENT)
		.await
		.expect("Reset token should be extracted.");

	assert_eq!(token, "0a1b2c3d-4e5f-6789-abcd-ef0123456789");

	forgot.assert_calls_async(1).await;
}

#[tokio::test]
async fn mail_without_token_is_an_error() {
	let server = MockServer::start_async().await;
	let _forgot = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_FORGOT_PASSWORD);
			then.status(200);
		})
		.await;
	let _search = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/search");
			then.status(200).json_body(search_body(1));
		})
		.await;
	let _message = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/v1/message/msg-0");
			then.status(200).json_body(json!({ "ID": "msg-0", "Text": "Welcome aboard." }));
		})
		.await;
	let err = build_harness(&server, 2)
		.mailpit_helper()
		.request_reset_token(RECIPIENT)
		.await
		.expect_err("A mail without a token should fail.");

	assert!(matches!(err, Error::MissingResetToken { ref recipient } if recipient == RECIPIENT));
}

#[tokio::test]
async fn delete_all_messages_hits_the_bulk_endpoint() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/v1/messages");
			then.status(200);
		})
		.await;
	let response = build_harness(&server, 1)
		.mailpit()
		.delete_all_messages()
		.await
		.expect("Delete should reach Mailpit.");

	assert_eq!(response.status(), 200);

	mock.assert_calls_async(1).await;
}
