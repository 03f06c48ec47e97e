mod common;

// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use time::Duration;
// self
use common::*;
use token_session::{
	reqwest::{Client, cookie::Jar},
	session::TokenSession,
};

#[tokio::test]
async fn sign_in_cookies_from_a_caller_jar_reach_the_token_endpoint() {
	let server = MockServer::start_async().await;
	let sign_in = server
		.mock_async(|when, then| {
			when.method(POST).path("/login");
			then.status(204).header("set-cookie", "refreshToken=abc; Path=/");
		})
		.await;
	let (token, _) = token_expiring_in("Ada", Duration::seconds(3600));
	let body = token_body(&token);
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token").header("cookie", "refreshToken=abc");
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await;
	let jar = Arc::new(Jar::default());
	let sign_in_client = Client::builder()
		.cookie_provider(jar.clone())
		.build()
		.expect("Sign-in client should build.");

	sign_in_client.post(server.url("/login")).send().await.expect("Sign-in should succeed.");
	sign_in.assert_async().await;

	let navigator = RecordingNavigator::default();
	let session =
		TokenSession::activate_with_cookie_jar(config(&server), Arc::new(navigator.clone()), jar)
			.await
			.expect("Session activation should succeed.");

	token_mock.assert_async().await;

	assert_eq!(session.token().expose(), token);
	assert!(session.cookie_jar().is_some());
	assert!(navigator.visits().is_empty());
}

#[tokio::test]
async fn cookies_set_on_guarded_responses_are_sent_on_the_next_token_fetch() {
	let server = MockServer::start_async().await;
	let (first, _) = token_expiring_in("Ada", Duration::seconds(3600));
	let first_body = token_body(&first);
	let anonymous = server
		.mock_async(|when, then| {
			when.method(GET).path("/token").header_missing("cookie");
			then.status(200).header("content-type", "application/json").body(first_body);
		})
		.await;
	let (rotated, _) = token_expiring_in("Rotated", Duration::seconds(3600));
	let rotated_body = token_body(&rotated);
	let with_cookie = server
		.mock_async(|when, then| {
			when.method(GET).path("/token").header("cookie", "refreshToken=abc");
			then.status(200).header("content-type", "application/json").body(rotated_body);
		})
		.await;
	let resource = server
		.mock_async(|when, then| {
			when.method(GET).path("/users");
			then.status(200).header("set-cookie", "refreshToken=abc; Path=/").body("[]");
		})
		.await;
	let navigator = RecordingNavigator::default();
	let session = activate(&server, &navigator).await;

	assert_eq!(session.display_name(), "Ada");

	let client = session.http_client();

	client.send(client.get(server.url("/users"))).await.expect("Guarded request should succeed.");
	session.fetch_initial_token().await.expect("Token fetch with the cookie should succeed.");

	anonymous.assert_calls_async(1).await;
	resource.assert_async().await;
	with_cookie.assert_calls_async(1).await;

	assert_eq!(session.display_name(), "Rotated");
	assert_eq!(session.token().expose(), rotated);
	assert!(navigator.visits().is_empty());
}
