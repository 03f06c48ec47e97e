//! Token session manager.
//!
//! [`TokenSession`] owns the in-memory [`SessionState`], fetches the first token when it
//! activates, and guards a [`SessionClient`] so every request carries a fresh bearer token.
//! Failures never surface as state: the initial fetch clears the token and redirects to the
//! login path, while a failed guard refresh redirects to the root path and rejects the request.
//!
//! Concurrent guard refreshes are not coordinated unless the config selects
//! [`RefreshPolicy::SingleFlight`]; see [`RefreshPolicy`] for both modes.

mod counters;
mod guard;
mod store;

pub use counters::{RefreshCounts, RefreshMetrics};
pub use guard::AuthorizationGuard;
pub use store::SessionStore;

// crates.io
use reqwest::cookie::Jar;
// self
use crate::{
	_prelude::*,
	auth::{SessionState, SessionStatus, TokenSecret},
	client::{GuardHandle, SessionClient},
	config::{RefreshPolicy, SessionConfig},
	error::ConfigError,
	http::{HttpTokenSource, TokenSource},
	navigate::{Navigator, Redirect},
	obs::{self, RefreshKind, RefreshOutcome, RefreshSpan},
};

/// State and collaborators shared between a session and the guards it hands out.
pub(crate) struct SessionCore {
	config: SessionConfig,
	source: Arc<dyn TokenSource>,
	navigator: Arc<dyn Navigator>,
	store: SessionStore,
	metrics: RefreshMetrics,
	refresh_lock: AsyncMutex<()>,
}
impl SessionCore {
	fn new(
		config: SessionConfig,
		source: Arc<dyn TokenSource>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self {
			config,
			source,
			navigator,
			store: SessionStore::default(),
			metrics: RefreshMetrics::default(),
			refresh_lock: AsyncMutex::new(()),
		}
	}

	/// Fetches, decodes, and stores a new token in one step.
	///
	/// The token and every claim derived from it land in the store through a single
	/// [`SessionStore::replace`], so readers never observe a mix of two responses.
	async fn refresh(&self, kind: RefreshKind, stage: &'static str) -> Result<SessionState> {
		let span = RefreshSpan::new(kind, stage);

		obs::record_refresh_outcome(kind, stage, RefreshOutcome::Attempt);
		self.metrics.record_attempt();

		let result: Result<SessionState> = span
			.instrument(async {
				let token = self.source.fetch_access_token().await?;
				let state = SessionState::from_token(token)?;

				self.store.replace(state.clone());

				Ok(state)
			})
			.await;

		match &result {
			Ok(_) => {
				self.metrics.record_success();
				obs::record_refresh_outcome(kind, stage, RefreshOutcome::Success);
			},
			Err(err) => {
				span.log_failure(err);
				self.metrics.record_failure();
				obs::record_refresh_outcome(kind, stage, RefreshOutcome::Failure);
				obs::record_refresh_failure(kind, stage, err.class());
			},
		}

		result
	}

	/// Returns the token to present now, refreshing first when the stored one has expired.
	async fn authorize(&self) -> Result<TokenSecret> {
		if let Some(token) = self.current_token() {
			return Ok(token);
		}

		match self.config.refresh_policy {
			RefreshPolicy::Independent => self.guard_refresh().await,
			RefreshPolicy::SingleFlight => {
				let _singleflight = self.refresh_lock.lock().await;

				// Another request may have refreshed while this one waited.
				if let Some(token) = self.current_token() {
					return Ok(token);
				}

				self.guard_refresh().await
			},
		}
	}

	fn current_token(&self) -> Option<TokenSecret> {
		let now = OffsetDateTime::now_utc();

		self.store.read(|state| (!state.is_expired_at(now)).then(|| state.token.clone()))
	}

	async fn guard_refresh(&self) -> Result<TokenSecret> {
		match self.refresh(RefreshKind::Guard, "authorization_guard").await {
			Ok(state) => Ok(state.token),
			Err(err) => {
				self.redirect(Redirect::Root);

				Err(err)
			},
		}
	}

	async fn fetch_initial_token(&self) -> Result<()> {
		match self.refresh(RefreshKind::Initial, "fetch_initial_token").await {
			Ok(_) => Ok(()),
			Err(err) => {
				if self.store.clear_token() {
					self.redirect(Redirect::Login);
				}

				Err(err)
			},
		}
	}

	/// Rejects a guarded request whose bearer header could not be built.
	///
	/// Handled like a failed guard refresh: logged, counted, and redirected to the root path.
	/// The stored token is kept.
	fn reject_authorization(&self, err: Error) -> Error {
		let stage = "authorization_header";

		RefreshSpan::new(RefreshKind::Guard, stage).log_failure(&err);
		obs::record_refresh_failure(RefreshKind::Guard, stage, err.class());
		self.redirect(Redirect::Root);

		err
	}

	fn redirect(&self, target: Redirect) {
		if self.store.is_closed() {
			return;
		}

		self.navigator.navigate(target.path(&self.config));
	}
}

/// Short-lived access token session bound to one guarded HTTP client.
///
/// Dropping the session (or calling [`TokenSession::deactivate`]) detaches its guard and
/// closes the state store. Refreshes already in flight run to completion, but their results
/// are discarded.
pub struct TokenSession {
	core: Arc<SessionCore>,
	http_client: SessionClient,
	cookie_jar: Option<Arc<Jar>>,
	guard: Mutex<Option<GuardHandle>>,
}
impl TokenSession {
	/// Activates a session against the configured token endpoint.
	///
	/// Equivalent to [`TokenSession::activate_with_cookie_jar`] with an empty jar.
	pub async fn activate(config: SessionConfig, navigator: Arc<dyn Navigator>) -> Result<Self> {
		Self::activate_with_cookie_jar(config, navigator, Arc::new(Jar::default())).await
	}

	/// Activates a session whose token source and guarded client share `jar`.
	///
	/// Cookies set on responses to either client, or placed in `jar` by the caller's own sign-in
	/// client, are sent on the next token fetch.
	pub async fn activate_with_cookie_jar(
		config: SessionConfig,
		navigator: Arc<dyn Navigator>,
		jar: Arc<Jar>,
	) -> Result<Self> {
		let source = HttpTokenSource::from_config_with_jar(&config, jar.clone())?;
		let client = ReqwestClient::builder()
			.cookie_provider(jar.clone())
			.build()
			.map_err(ConfigError::http_client_build)?;
		let mut session =
			Self::with_source(config, Arc::new(source), navigator, SessionClient::new(client))
				.await;

		session.cookie_jar = Some(jar);

		Ok(session)
	}

	/// Activates a session with a caller-supplied token source and client.
	///
	/// Performs the initial fetch, then attaches the authorization guard to `http_client`.
	/// A failed initial fetch does not fail activation; it leaves the session empty and
	/// redirects to the login path.
	pub async fn with_source(
		config: SessionConfig,
		source: Arc<dyn TokenSource>,
		navigator: Arc<dyn Navigator>,
		http_client: SessionClient,
	) -> Self {
		let session = Self {
			core: Arc::new(SessionCore::new(config, source, navigator)),
			http_client,
			cookie_jar: None,
			guard: Mutex::new(None),
		};

		// Failures were already logged, cleared, and redirected.
		let _ = session.fetch_initial_token().await;
		let handle = session.attach_authorization_guard(&session.http_client);

		*session.guard.lock() = Some(handle);

		session
	}

	/// Fetches a token with ambient credentials and replaces the session state.
	///
	/// On failure the token is cleared and the navigator is sent to the login path before the
	/// error is returned. The error is informational; no retry happens.
	pub async fn fetch_initial_token(&self) -> Result<()> {
		self.core.fetch_initial_token().await
	}

	/// Registers the authorization guard on `client`.
	///
	/// Every request sent through `client` afterwards carries `Authorization: Bearer <token>`,
	/// refreshing first when the stored token has expired. Detach with the returned handle.
	pub fn attach_authorization_guard(&self, client: &SessionClient) -> GuardHandle {
		client.intercept(Arc::new(AuthorizationGuard::new(self.core.clone())))
	}

	/// Detaches the session's guard and discards any state written afterwards.
	pub fn deactivate(self) {
		drop(self);
	}

	/// Guarded HTTP client owned by this session.
	pub fn http_client(&self) -> &SessionClient {
		&self.http_client
	}

	/// Cookie jar shared by the token source and the guarded client.
	///
	/// `None` for sessions built with [`TokenSession::with_source`].
	pub fn cookie_jar(&self) -> Option<&Arc<Jar>> {
		self.cookie_jar.as_ref()
	}

	/// Current access token; empty when absent.
	pub fn token(&self) -> TokenSecret {
		self.core.store.read(|state| state.token.clone())
	}

	/// Display name claim of the current token.
	pub fn display_name(&self) -> String {
		self.core.store.read(|state| state.display_name.clone())
	}

	/// Role claim of the current token.
	pub fn role(&self) -> String {
		self.core.store.read(|state| state.role.clone())
	}

	/// User identifier claim of the current token.
	pub fn user_id(&self) -> String {
		self.core.store.read(|state| state.user_id.clone())
	}

	/// Expiry of the current token.
	pub fn expires_at(&self) -> OffsetDateTime {
		self.core.store.read(|state| state.expires_at)
	}

	/// Status of the session right now.
	pub fn status(&self) -> SessionStatus {
		self.core.store.read(SessionState::status)
	}

	/// Copy of the whole session state.
	pub fn snapshot(&self) -> SessionState {
		self.core.store.snapshot()
	}

	/// Refresh counters for this session.
	pub fn metrics(&self) -> &RefreshMetrics {
		&self.core.metrics
	}

	/// Config the session was activated with.
	pub fn config(&self) -> &SessionConfig {
		&self.core.config
	}
}
impl Drop for TokenSession {
	fn drop(&mut self) {
		if let Some(handle) = self.guard.lock().take() {
			handle.detach();
		}

		self.core.store.close();
	}
}
impl Debug for TokenSession {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenSession")
			.field("state", &self.core.store.snapshot())
			.field("refreshes", &self.core.metrics.counts())
			.field("config", &self.core.config)
			.field("http_client", &self.http_client)
			.finish()
	}
}
