mod common;

// crates.io
use httpmock::prelude::*;
use time::Duration;
// self
use common::*;
use token_session::auth::SessionStatus;

#[tokio::test]
async fn activation_fetches_and_decodes_the_token() {
	let server = MockServer::start_async().await;
	let (token, exp) = token_expiring_in("Ada Lovelace", Duration::hours(1));
	let mock = mock_token(&server, &token).await;
	let navigator = RecordingNavigator::default();
	let session = activate(&server, &navigator).await;

	mock.assert_async().await;

	assert_eq!(session.token().expose(), token);
	assert_eq!(session.display_name(), "Ada Lovelace");
	assert_eq!(session.role(), "admin");
	assert_eq!(session.user_id(), "42");
	assert_eq!(session.expires_at().unix_timestamp(), exp.unix_timestamp());
	assert_eq!(session.status(), SessionStatus::Valid);
	assert!(navigator.visits().is_empty());
}

#[tokio::test]
async fn unauthorized_initial_fetch_clears_token_and_redirects_to_login_once() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(401).body("Unauthorized");
		})
		.await;
	let navigator = RecordingNavigator::default();
	let session = activate(&server, &navigator).await;

	mock.assert_async().await;

	assert_eq!(session.token().expose(), "");
	assert_eq!(session.status(), SessionStatus::Expired);
	assert_eq!(navigator.count("/login"), 1);
	assert_eq!(navigator.visits().len(), 1);
	assert_eq!(session.metrics().failures(), 1);
}

#[tokio::test]
async fn malformed_token_body_is_treated_like_a_failed_fetch() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(200).header("content-type", "application/json").body("{\"token\":1}");
		})
		.await;
	let navigator = RecordingNavigator::default();
	let session = activate(&server, &navigator).await;

	assert!(session.token().is_empty());
	assert_eq!(navigator.visits(), vec!["/login".to_owned()]);
}

#[tokio::test]
async fn refetch_failure_keeps_redirecting_without_retry() {
	let server = MockServer::start_async().await;
	let (token, _) = token_expiring_in("Ada", Duration::hours(1));
	let mut good = mock_token(&server, &token).await;
	let navigator = RecordingNavigator::default();
	let session = activate(&server, &navigator).await;

	assert_eq!(session.token().expose(), token);

	good.delete_async().await;

	let bad = server
		.mock_async(|when, then| {
			when.method(GET).path("/token");
			then.status(500);
		})
		.await;
	let err = session.fetch_initial_token().await.expect_err("Refetch should fail.");

	assert!(err.is_refresh_failure());
	bad.assert_calls_async(1).await;

	assert!(session.token().is_empty());
	assert_eq!(session.status(), SessionStatus::Expired);
	assert_eq!(session.display_name(), "Ada");
	assert_eq!(navigator.count("/login"), 1);
}
