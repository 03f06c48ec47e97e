// crates.io
use reqwest::{
	Request,
	header::{AUTHORIZATION, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	client::{HookFuture, RequestHook},
	error::ConfigError,
	session::SessionCore,
};

/// Pre-request hook that keeps the bearer token fresh.
///
/// For every request it compares the stored expiry with the current time. An expired token is
/// refreshed before the header is stamped; a failed refresh redirects to the root path and
/// rejects the request. A valid token is stamped as is, without contacting the endpoint.
/// A token that cannot be encoded as a header value takes the same failure path.
pub struct AuthorizationGuard {
	core: Arc<SessionCore>,
}
impl AuthorizationGuard {
	pub(crate) fn new(core: Arc<SessionCore>) -> Self {
		Self { core }
	}
}
impl RequestHook for AuthorizationGuard {
	fn on_request<'a>(&'a self, request: &'a mut Request) -> HookFuture<'a> {
		Box::pin(async move {
			let token = self.core.authorize().await?;
			let mut value = match HeaderValue::from_str(&token.bearer()) {
				Ok(value) => value,
				Err(e) =>
					return Err(self.core.reject_authorization(ConfigError::http_request(e).into())),
			};

			value.set_sensitive(true);
			request.headers_mut().insert(AUTHORIZATION, value);

			Ok(())
		})
	}
}
impl Debug for AuthorizationGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("AuthorizationGuard(..)")
	}
}
