//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::sync::Arc;
// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use httpmock::prelude::*;
use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};
// self
use token_session::{
	client::SessionClient, config::SessionConfig, navigate::Navigator, session::TokenSession,
	url::Url,
};

/// Navigator that records every path it is asked to visit.
#[derive(Clone, Debug, Default)]
pub struct RecordingNavigator {
	visits: Arc<Mutex<Vec<String>>>,
}
impl RecordingNavigator {
	pub fn visits(&self) -> Vec<String> {
		self.visits.lock().clone()
	}

	pub fn count(&self, path: &str) -> usize {
		self.visits.lock().iter().filter(|visit| visit.as_str() == path).count()
	}
}
impl Navigator for RecordingNavigator {
	fn navigate(&self, path: &str) {
		self.visits.lock().push(path.to_owned());
	}
}

/// Mints an unsigned JWT-shaped token whose `exp` lies `offset` away from now.
pub fn token_expiring_in(name: &str, offset: Duration) -> (String, OffsetDateTime) {
	let exp = OffsetDateTime::now_utc() + offset;
	let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
	let payload = serde_json::json!({
		"name": name,
		"role": "admin",
		"id": 42,
		"exp": exp.unix_timestamp(),
	});
	let payload = URL_SAFE_NO_PAD.encode(payload.to_string());

	(format!("{header}.{payload}.c2lnbmF0dXJl"), exp)
}

pub fn token_body(token: &str) -> String {
	format!("{{\"accessToken\":\"{token}\"}}")
}

pub fn config(server: &MockServer) -> SessionConfig {
	SessionConfig::builder(
		Url::parse(&server.base_url()).expect("Mock server base URL should parse."),
	)
	.build()
	.expect("Mock server config should be valid.")
}

/// Mocks `GET /token` with a successful response carrying `token`.
pub async fn mock_token<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = token_body(token);

	server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

/// Activates a session against `server`.
pub async fn activate(server: &MockServer, navigator: &RecordingNavigator) -> TokenSession {
	TokenSession::activate(config(server), Arc::new(navigator.clone()))
		.await
		.expect("Session activation should succeed.")
}

pub fn plain_client() -> SessionClient {
	SessionClient::default()
}
