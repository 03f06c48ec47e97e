//! Observability helpers for token refreshes.
//!
//! # Feature Flags
//!
//! - `tracing` (default) wraps every refresh in a span named `token_session.refresh` with the
//!   `kind` (initial/guard) and `stage` fields, and logs refresh failures.
//! - `metrics` increments the `token_session_refresh_total` counter for every
//!   attempt/success/failure, labeled by `kind`, `stage` and `outcome`. Failures also bump
//!   `token_session_refresh_failure_total`, labeled by `kind`, `stage` and the error `class`
//!   (`config`, `fetch`, `decode` or `transport`).

mod counter;
mod span;

pub use counter::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Call sites that refresh the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshKind {
	/// Fetch performed when the session activates.
	Initial,
	/// Just-in-time refresh performed by the authorization guard.
	Guard,
}
impl RefreshKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshKind::Initial => "initial",
			RefreshKind::Guard => "guard",
		}
	}
}
impl Display for RefreshKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each refresh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RefreshOutcome {
	/// Refresh started.
	Attempt,
	/// Refresh produced a new session state.
	Success,
	/// Refresh failed.
	Failure,
}
impl RefreshOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RefreshOutcome::Attempt => "attempt",
			RefreshOutcome::Success => "success",
			RefreshOutcome::Failure => "failure",
		}
	}
}
impl Display for RefreshOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
