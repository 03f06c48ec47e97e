//! Session configuration and its validating builder.

// self
use crate::{_prelude::*, error::ConfigError};

/// How concurrent guard refreshes are coordinated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
	#[default]
	/// Every expired request refreshes on its own; concurrent requests may refresh redundantly.
	Independent,
	/// Guard refreshes queue on a shared lock and reuse a token refreshed while they waited.
	SingleFlight,
}

/// Validated configuration consumed by [`TokenSession`](crate::session::TokenSession).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
	/// Base URL of the token service.
	pub base_url: Url,
	/// Path joined onto `base_url` to reach the token endpoint.
	#[serde(default = "SessionConfig::default_token_path")]
	pub token_path: String,
	/// Redirect target after the initial fetch fails.
	#[serde(default = "SessionConfig::default_login_path")]
	pub login_path: String,
	/// Redirect target after a guard refresh fails.
	#[serde(default = "SessionConfig::default_root_path")]
	pub root_path: String,
	/// Coordination mode for concurrent guard refreshes.
	#[serde(default)]
	pub refresh_policy: RefreshPolicy,
}
impl SessionConfig {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> SessionConfigBuilder {
		SessionConfigBuilder::new(base_url)
	}

	/// Resolves the absolute token endpoint URL.
	///
	/// A trailing slash is appended to the base path first so the token path extends it instead
	/// of replacing its last segment.
	pub fn token_endpoint(&self) -> Result<Url, ConfigError> {
		let mut base = self.base_url.clone();

		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		base.join(self.token_path.trim_start_matches('/')).map_err(|source| {
			ConfigError::InvalidTokenPath { path: self.token_path.clone(), source }
		})
	}

	/// Validates invariants for the config; builders call this automatically.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.base_url.scheme() {
			"http" | "https" => {},
			scheme => return Err(ConfigError::UnsupportedScheme { scheme: scheme.to_owned() }),
		}

		if self.base_url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { url: self.base_url.to_string() });
		}
		if self.login_path.trim().is_empty() {
			return Err(ConfigError::EmptyRedirectPath { target: "login" });
		}
		if self.root_path.trim().is_empty() {
			return Err(ConfigError::EmptyRedirectPath { target: "root" });
		}

		self.token_endpoint()?;

		Ok(())
	}

	fn default_token_path() -> String {
		"token".into()
	}

	fn default_login_path() -> String {
		"/login".into()
	}

	fn default_root_path() -> String {
		"/".into()
	}
}

/// Builder for [`SessionConfig`] values.
#[derive(Debug)]
pub struct SessionConfigBuilder {
	base_url: Url,
	token_path: String,
	login_path: String,
	root_path: String,
	refresh_policy: RefreshPolicy,
}
impl SessionConfigBuilder {
	fn new(base_url: Url) -> Self {
		Self {
			base_url,
			token_path: SessionConfig::default_token_path(),
			login_path: SessionConfig::default_login_path(),
			root_path: SessionConfig::default_root_path(),
			refresh_policy: RefreshPolicy::default(),
		}
	}

	/// Overrides the token endpoint path (defaults to `token`).
	pub fn token_path(mut self, path: impl Into<String>) -> Self {
		self.token_path = path.into();

		self
	}

	/// Overrides the login redirect path (defaults to `/login`).
	pub fn login_path(mut self, path: impl Into<String>) -> Self {
		self.login_path = path.into();

		self
	}

	/// Overrides the root redirect path (defaults to `/`).
	pub fn root_path(mut self, path: impl Into<String>) -> Self {
		self.root_path = path.into();

		self
	}

	/// Overrides the refresh coordination policy.
	pub fn refresh_policy(mut self, policy: RefreshPolicy) -> Self {
		self.refresh_policy = policy;

		self
	}

	/// Consumes the builder and validates the resulting config.
	pub fn build(self) -> Result<SessionConfig, ConfigError> {
		let config = SessionConfig {
			base_url: self.base_url,
			token_path: self.token_path,
			login_path: self.login_path,
			root_path: self.root_path,
			refresh_policy: self.refresh_policy,
		};

		config.validate()?;

		Ok(config)
	}
}
