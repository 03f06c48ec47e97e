//! Token endpoint transport.
//!
//! The session depends on [`TokenSource`] only, so tests and embedders can swap in their own
//! fetcher. [`HttpTokenSource`] is the reqwest-backed default that calls `GET {base}/token`
//! with ambient cookie credentials and reads `{ "accessToken": "..." }`.

// crates.io
use reqwest::{cookie::Jar, redirect::Policy};
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	config::SessionConfig,
	error::{ConfigError, FetchError},
};

/// Boxed future returned by [`TokenSource::fetch_access_token`].
pub type TokenFuture<'a> =
	Pin<Box<dyn Future<Output = Result<TokenSecret, FetchError>> + 'a + Send>>;

/// Anything able to hand out a fresh access token.
pub trait TokenSource
where
	Self: Send + Sync,
{
	/// Fetches a new access token from the issuer.
	fn fetch_access_token(&self) -> TokenFuture<'_>;
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
	access_token: String,
}

/// Reqwest-backed [`TokenSource`] calling the configured token endpoint.
///
/// The endpoint should answer directly, so redirect following is disabled on clients built by
/// [`HttpTokenSource::from_config`]; configure custom clients the same way.
#[derive(Clone, Debug)]
pub struct HttpTokenSource {
	client: ReqwestClient,
	endpoint: Url,
}
impl HttpTokenSource {
	const BODY_PREVIEW_LIMIT: usize = 256;

	/// Builds a source with a cookie-aware client and a private cookie jar.
	pub fn from_config(config: &SessionConfig) -> Result<Self, ConfigError> {
		Self::from_config_with_jar(config, Arc::new(Jar::default()))
	}

	/// Builds a source whose ambient credentials come from `jar`.
	///
	/// Share the jar with the clients that sign in or receive rotated session cookies, so the
	/// token endpoint sees the same cookies they do.
	pub fn from_config_with_jar(
		config: &SessionConfig,
		jar: Arc<Jar>,
	) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.cookie_provider(jar)
			.redirect(Policy::none())
			.build()
			.map_err(ConfigError::http_client_build)?;

		Self::with_client(client, config)
	}

	/// Wraps an existing reqwest client.
	pub fn with_client(client: ReqwestClient, config: &SessionConfig) -> Result<Self, ConfigError> {
		Ok(Self { client, endpoint: config.token_endpoint()? })
	}

	/// Returns the resolved token endpoint.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	async fn fetch(&self) -> Result<TokenSecret, FetchError> {
		let response = self.client.get(self.endpoint.clone()).send().await?;
		let status = response.status();
		let body = response.bytes().await?;

		if !status.is_success() {
			return Err(FetchError::Status {
				status: status.as_u16(),
				body_preview: body_preview(&body, Self::BODY_PREVIEW_LIMIT),
			});
		}

		let de = &mut serde_json::Deserializer::from_slice(&body);
		let parsed: TokenResponse = serde_path_to_error::deserialize(de)
			.map_err(|source| FetchError::ResponseParse { source, status: status.as_u16() })?;

		Ok(TokenSecret::new(parsed.access_token))
	}
}
impl TokenSource for HttpTokenSource {
	fn fetch_access_token(&self) -> TokenFuture<'_> {
		Box::pin(self.fetch())
	}
}

fn body_preview(body: &[u8], limit: usize) -> Option<String> {
	if body.is_empty() {
		return None;
	}

	let text = String::from_utf8_lossy(&body[..body.len().min(limit)]);

	Some(text.into_owned())
}
