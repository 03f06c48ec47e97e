//! Reqwest client wrapper with pre-request hooks.
//!
//! Reqwest has no interceptor chain, so [`SessionClient`] keeps one: hooks registered through
//! [`SessionClient::intercept`] run in registration order against every request sent through
//! [`SessionClient::execute`] or [`SessionClient::send`]. Each registration returns a
//! [`GuardHandle`] that removes the hook again.

// std
use std::sync::{
	Weak,
	atomic::{AtomicU64, Ordering},
};
// crates.io
use reqwest::{IntoUrl, Method, Request, RequestBuilder, Response};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`RequestHook::on_request`].
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;

/// Pre-request hook run by [`SessionClient`] before a request is sent.
///
/// Returning an error aborts the request; nothing is sent and later hooks do not run.
pub trait RequestHook
where
	Self: Send + Sync,
{
	/// Inspects or mutates the outgoing request.
	fn on_request<'a>(&'a self, request: &'a mut Request) -> HookFuture<'a>;
}

type HookList = RwLock<Vec<(u64, Arc<dyn RequestHook>)>>;

/// Reqwest client whose requests pass through registered [`RequestHook`]s.
///
/// Clones share the same hook list. Builders returned by [`SessionClient::get`] and friends must
/// be sent through [`SessionClient::send`]; calling `RequestBuilder::send` directly skips the
/// hooks.
#[derive(Clone, Default)]
pub struct SessionClient {
	client: ReqwestClient,
	hooks: Arc<HookList>,
	next_id: Arc<AtomicU64>,
}
impl SessionClient {
	/// Wraps an existing reqwest client.
	pub fn new(client: ReqwestClient) -> Self {
		Self { client, hooks: Default::default(), next_id: Default::default() }
	}

	/// Registers `hook` and returns the handle that removes it.
	pub fn intercept(&self, hook: Arc<dyn RequestHook>) -> GuardHandle {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);

		self.hooks.write().push((id, hook));

		GuardHandle { id, hooks: Arc::downgrade(&self.hooks) }
	}

	/// Number of hooks currently registered.
	pub fn hook_count(&self) -> usize {
		self.hooks.read().len()
	}

	/// Starts a request with the inner client.
	pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
		self.client.request(method, url)
	}

	/// Starts a `GET` request with the inner client.
	pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
		self.client.get(url)
	}

	/// Starts a `POST` request with the inner client.
	pub fn post(&self, url: impl IntoUrl) -> RequestBuilder {
		self.client.post(url)
	}

	/// Runs every registered hook against `request` without sending it.
	pub async fn prepare(&self, mut request: Request) -> Result<Request> {
		// Snapshot so hooks never run under the list lock.
		let hooks = self.hooks.read().iter().map(|(_, hook)| hook.clone()).collect::<Vec<_>>();

		for hook in hooks {
			hook.on_request(&mut request).await?;
		}

		Ok(request)
	}

	/// Runs the hooks and sends the request.
	pub async fn execute(&self, request: Request) -> Result<Response> {
		let request = self.prepare(request).await?;

		Ok(self.client.execute(request).await.map_err(TransportError::from)?)
	}

	/// Builds the request from `builder`, runs the hooks, and sends it.
	pub async fn send(&self, builder: RequestBuilder) -> Result<Response> {
		let request = builder.build().map_err(ConfigError::http_request)?;

		self.execute(request).await
	}
}
impl AsRef<ReqwestClient> for SessionClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Debug for SessionClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SessionClient").field("hooks", &self.hook_count()).finish()
	}
}

/// Detachment handle returned by [`SessionClient::intercept`].
///
/// Dropping the handle leaves the hook registered; call [`GuardHandle::detach`] to remove it.
#[must_use = "dropping the handle leaves the hook attached with no way to remove it"]
#[derive(Debug)]
pub struct GuardHandle {
	id: u64,
	hooks: Weak<HookList>,
}
impl GuardHandle {
	/// Removes the hook from its client.
	///
	/// Returns `false` when the hook was already gone or the client no longer exists.
	pub fn detach(self) -> bool {
		let Some(hooks) = self.hooks.upgrade() else {
			return false;
		};
		let mut hooks = hooks.write();
		let before = hooks.len();

		hooks.retain(|(id, _)| *id != self.id);

		hooks.len() != before
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use reqwest::header::{HeaderName, HeaderValue};
	// self
	use super::*;

	struct StampHook(&'static str);
	impl RequestHook for StampHook {
		fn on_request<'a>(&'a self, request: &'a mut Request) -> HookFuture<'a> {
			Box::pin(async move {
				request
					.headers_mut()
					.append(HeaderName::from_static("x-stamp"), HeaderValue::from_static(self.0));

				Ok(())
			})
		}
	}

	fn request(client: &SessionClient) -> Request {
		client.get("http://localhost/resource").build().expect("Test request should build.")
	}

	fn stamps(request: &Request) -> Vec<&str> {
		request
			.headers()
			.get_all("x-stamp")
			.iter()
			.map(|value| value.to_str().expect("Stamp should be ASCII."))
			.collect()
	}

	#[tokio::test]
	async fn hooks_run_in_registration_order() {
		let client = SessionClient::default();
		let _first = client.intercept(Arc::new(StampHook("first")));
		let _second = client.intercept(Arc::new(StampHook("second")));
		let prepared =
			client.prepare(request(&client)).await.expect("Hooks should not fail the request.");

		assert_eq!(stamps(&prepared), vec!["first", "second"]);
	}

	#[tokio::test]
	async fn detach_removes_only_its_hook() {
		let client = SessionClient::default();
		let first = client.intercept(Arc::new(StampHook("first")));
		let _second = client.clone().intercept(Arc::new(StampHook("second")));

		assert_eq!(client.hook_count(), 2);
		assert!(first.detach());
		assert_eq!(client.hook_count(), 1);

		let prepared =
			client.prepare(request(&client)).await.expect("Hooks should not fail the request.");

		assert_eq!(stamps(&prepared), vec!["second"]);
	}

	#[test]
	fn detach_after_client_drop_is_noop() {
		let client = SessionClient::default();
		let handle = client.intercept(Arc::new(StampHook("orphan")));

		drop(client);

		assert!(!handle.detach());
	}
}
