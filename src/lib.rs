//! Short-lived access token sessions for reqwest: fetch a bearer token, decode its identity
//! claims, stamp it onto outgoing requests, and refresh it just in time when it expires.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod navigate;
pub mod obs;
pub mod session;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// crates.io
	use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
	// self
	use crate::{client::SessionClient, config::SessionConfig, navigate::Navigator};

	/// Navigator that records every path it is asked to visit.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingNavigator {
		visits: Arc<Mutex<Vec<String>>>,
	}
	impl RecordingNavigator {
		/// Returns every recorded navigation in call order.
		pub fn visits(&self) -> Vec<String> {
			self.visits.lock().clone()
		}

		/// Counts how many times `path` was visited.
		pub fn count(&self, path: &str) -> usize {
			self.visits.lock().iter().filter(|visit| visit.as_str() == path).count()
		}
	}
	impl Navigator for RecordingNavigator {
		fn navigate(&self, path: &str) {
			self.visits.lock().push(path.to_owned());
		}
	}

	/// Mints an unsigned JWT-shaped token carrying the provided claims.
	///
	/// The header and signature segments are fixed placeholders; decoding never inspects them.
	pub fn mint_token(name: &str, role: &str, id: &str, exp: OffsetDateTime) -> String {
		let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
		let payload = serde_json::json!({
			"name": name,
			"role": role,
			"id": id,
			"exp": exp.unix_timestamp(),
		});
		let payload = URL_SAFE_NO_PAD.encode(payload.to_string());

		format!("{header}.{payload}.c2lnbmF0dXJl")
	}

	/// Builds a session config pointing at `base_url` with default redirect paths.
	pub fn test_config(base_url: &str) -> SessionConfig {
		let base_url = Url::parse(base_url).expect("Test base URL should parse.");

		SessionConfig::builder(base_url).build().expect("Test session config should be valid.")
	}

	/// Builds a plain session client for tests.
	pub fn test_session_client() -> SessionClient {
		let client = ReqwestClient::builder()
			.build()
			.expect("Failed to build Reqwest client for tests.");

		SessionClient::new(client)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
