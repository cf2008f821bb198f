//! Async API test harness for the KPI Student Council backend: typed REST clients, a
//! single-flight bearer-token cache, a LIFO cleanup registry, and Mailpit poll-wait helpers.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod assert;
pub mod auth;
pub mod client;
pub mod config;
pub mod data;
pub mod error;
pub mod harness;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod obs;
pub mod schema;

pub use harness::Harness;

#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::{HarnessConfig, TierCredentials},
		harness::Harness,
	};

	/// Builds a config pointing both the backend and Mailpit at `base` with fast polling.
	pub fn test_config(base: &str) -> HarnessConfig {
		let url = Url::parse(base).expect("Mock server URL should parse.");
		let mut config = HarnessConfig::default();

		config.base_url = url.clone();
		config.timeout_ms = 5_000;
		config.mailpit.base_url = url;
		config.mailpit.timeout_seconds = 1;
		config.mailpit.poll_interval_ms = 50;
		config.retry.backoff_ms = 0;

		config
	}

	/// Same as [`test_config`] but with auth enabled and a `basic` + `admin` tier configured.
	pub fn test_config_with_tiers(base: &str) -> HarnessConfig {
		let mut config = test_config(base);

		config.auth.enabled = true;
		config.auth.tier_credentials.insert(
			"basic".into(),
			TierCredentials::new("basic@sc.kpi.ua", "Basic@123456"),
		);
		config.auth.tier_credentials.insert(
			"admin".into(),
			TierCredentials::new("admin@sc.kpi.ua", "Admin@123456"),
		);

		config
	}

	/// Builds a [`Harness`] against the provided mock server base URL.
	pub fn build_test_harness(config: HarnessConfig) -> Harness {
		Harness::new(config).expect("Test harness should build from a valid config.")
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
