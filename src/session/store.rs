// std
use std::sync::atomic::{AtomicBool, Ordering};
// self
use crate::{_prelude::*, auth::SessionState};

/// Shared cell holding the session state for one [`TokenSession`](super::TokenSession).
///
/// Once closed, writes are ignored so refreshes that outlive the session leave no trace.
#[derive(Debug, Default)]
pub struct SessionStore {
	state: RwLock<SessionState>,
	closed: AtomicBool,
}
impl SessionStore {
	/// Returns a copy of the current state.
	pub fn snapshot(&self) -> SessionState {
		self.state.read().clone()
	}

	/// Reads the current state in place.
	pub fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
		f(&self.state.read())
	}

	/// Replaces the whole state; returns `false` if the store is closed.
	pub fn replace(&self, next: SessionState) -> bool {
		let mut state = self.state.write();

		if self.is_closed() {
			return false;
		}

		*state = next;

		true
	}

	/// Clears the token and its expiry; returns `false` if the store is closed.
	pub fn clear_token(&self) -> bool {
		let mut state = self.state.write();

		if self.is_closed() {
			return false;
		}

		state.clear_token();

		true
	}

	/// Stops accepting writes.
	pub fn close(&self) {
		let _state = self.state.write();

		self.closed.store(true, Ordering::Release);
	}

	/// Returns `true` once [`SessionStore::close`] ran.
	pub fn is_closed(&self) -> bool {
		self.closed.load(Ordering::Acquire)
	}
}
