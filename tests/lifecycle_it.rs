// std
use std::{
	fs,
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use sc_api_harness::{
	Harness,
	config::{Endpoint, HarnessConfig, TierCredentials},
	error::{BoxError, Error},
	lifecycle::ENVIRONMENT_FILE,
	obs::{self, OpKind, OpOutcome},
	url::Url,
};

fn base_config(base: &str) -> HarnessConfig {
	let url = Url::parse(base).expect("Base URL should parse.");
	let mut config = HarnessConfig::default();

	config.base_url = url.clone();
	config.mailpit.base_url = url;
	config.timeout_ms = 5_000;

	config
}

fn results_dir(label: &str) -> std::path::PathBuf {
	std::env::temp_dir().join(format!("sc-api-harness-{label}-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn start_checks_health_and_writes_environment() {
	let server = MockServer::start_async().await;
	let health = server
		.mock_async(|when, then| {
			when.method(GET).path(Endpoint::HEALTH);
			then.status(200).json_body(json!({ "status": "UP" }));
		})
		.await;
	let dir = results_dir("start");
	let harness = Harness::new(base_config(&server.base_url())).expect("Harness should build.");
	let execution =
		harness.execution().with_results_dir(&dir).with_profile(Some("staging".into()));

	let checks = obs::outcome_count(OpKind::HealthCheck, OpOutcome::Success);

	execution.start().await.expect("Healthy API should pass the start-up health check.");
	health.assert_calls_async(1).await;

	assert!(obs::outcome_count(OpKind::HealthCheck, OpOutcome::Success) > checks);

	let written = fs::read_to_string(dir.join(ENVIRONMENT_FILE))
		.expect("Environment properties should be written.");

	assert!(written.contains("Environment\\ Profile=staging"));
	assert!(written.contains("Auth\\ Enabled=false"));
	assert!(written.contains("Thread\\ Count=1"));

	fs::remove_dir_all(&dir).expect("Temporary results directory should be removable.");
}

#[tokio::test]
async fn start_fails_when_api_is_unreachable() {
	let harness =
		Harness::new(base_config("http://127.0.0.1:9")).expect("Harness should build.");
	let dir = results_dir("down");
	let failures = obs::outcome_count(OpKind::HealthCheck, OpOutcome::Failure);
	let err = harness
		.execution()
		.with_results_dir(&dir)
		.start()
		.await
		.expect_err("An unreachable API should abort the run.");

	assert!(matches!(&err, Error::ApiNotAvailable { base_url, .. } if base_url == "http://127.0.0.1:9"));
	assert!(err.to_string().contains("Start the API before running tests"));
	assert!(
		err.context()
			.iter()
			.any(|(k, v)| *k == "healthEndpoint" && v == "http://127.0.0.1:9/actuator/health")
	);
	assert!(obs::outcome_count(OpKind::HealthCheck, OpOutcome::Failure) > failures);

	let _ = fs::remove_dir_all(&dir);
}

#[tokio::test]
async fn finish_drains_cleanup_and_clears_tokens() {
	let server = MockServer::start_async().await;
	let _login = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_LOGIN);
			then.status(200).json_body(json!({ "accessToken": "t", "expiresIn": 3_600 }));
		})
		.await;
	let harness = Harness::new(base_config(&server.base_url())).expect("Harness should build.");
	let ran = Arc::new(AtomicUsize::new(0));

	harness.tokens().token_for("a@sc.kpi.ua", "A@123456").await.expect("Login should succeed.");

	for name in ["ok", "boom", "panic"] {
		let ran = ran.clone();

		harness.cleanup().register(name, move || async move {
			ran.fetch_add(1, Ordering::SeqCst);

			match name {
				"panic" => panic!("assertion inside teardown"),
				"boom" => Err::<(), BoxError>("boom failed".into()),
				_ => Ok(()),
			}
		});
	}

	let outcome = harness.execution().finish().await.expect("Cleanup is enabled by default.");
	let err = outcome.expect_err("Two cleanup actions should fail.");

	assert_eq!(ran.load(Ordering::SeqCst), 3);
	assert_eq!(err.total, 3);
	assert_eq!(err.descriptions(), ["panic", "boom"]);
	assert!(harness.cleanup().is_empty());
	assert!(harness.tokens().is_empty());

	let wrapped = Error::from(err);

	assert_eq!(wrapped.kind(), "CleanupError");
	assert!(wrapped.context().contains(&("failedDescriptions", "panic, boom".to_owned())));
}

#[tokio::test]
async fn finish_skips_cleanup_when_disabled() {
	let mut config = base_config("http://127.0.0.1:9");

	config.cleanup.enabled = false;

	let harness = Harness::new(config).expect("Harness should build.");

	harness.cleanup().register("kept", || async { Ok::<(), BoxError>(()) });

	assert!(harness.execution().finish().await.is_none());
	assert_eq!(harness.cleanup().len(), 1);
}

#[tokio::test]
async fn tracked_users_are_deleted_with_the_admin_tier() {
	let server = MockServer::start_async().await;
	let register = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_REGISTER);
			then.status(201).json_body(json!({ "id": "user-42", "email": "new@sc.kpi.ua" }));
		})
		.await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_LOGIN).body_includes("admin@sc.kpi.ua");
			then.status(200).json_body(json!({ "accessToken": "admin-token", "expiresIn": 3_600 }));
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE)
				.path("/api/v1/users/user-42")
				.header("authorization", "Bearer admin-token");
			then.status(204);
		})
		.await;
	let mut config = base_config(&server.base_url());

	config.auth.enabled = true;
	config
		.auth
		.tier_credentials
		.insert("admin".into(), TierCredentials::new("admin@sc.kpi.ua", "Admin@123456"));

	let harness = Harness::new(config).expect("Harness should build.");
	let request = harness
		.data_manager()
		.create_and_register_user()
		.await
		.expect("Registration should succeed.");

	assert!(request.password.starts_with("Test@"));
	assert_eq!(harness.cleanup().descriptions(), [format!("Delete user: {}", request.email)]);

	let report = harness.cleanup().execute_all().await.expect("Deletion should succeed.");

	assert_eq!(report.succeeded, 1);

	register.assert_calls_async(1).await;
	login.assert_calls_async(1).await;
	delete.assert_calls_async(1).await;
}

#[tokio::test]
async fn failed_registrations_are_not_tracked() {
	let server = MockServer::start_async().await;
	let _register = server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoint::AUTH_REGISTER);
			then.status(409).json_body(json!({ "title": "Conflict", "status": 409 }));
		})
		.await;
	let harness = Harness::new(base_config(&server.base_url())).expect("Harness should build.");
	let request = sc_api_harness::data::TestDataFactory::valid_register_request();
	let response = harness
		.data_manager()
		.register_user_and_track(&request)
		.await
		.expect("A conflict is still a response.");

	assert_eq!(response.status(), 409);
	assert!(harness.cleanup().is_empty());
}
