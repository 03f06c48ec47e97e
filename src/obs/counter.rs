// self
use crate::obs::{RefreshKind, RefreshOutcome};

/// Records a refresh outcome via the global metrics recorder (when enabled).
///
/// `stage` names the session operation that triggered the refresh, e.g. `fetch_initial_token`.
pub fn record_refresh_outcome(kind: RefreshKind, stage: &'static str, outcome: RefreshOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"token_session_refresh_total",
			"kind" => kind.as_str(),
			"stage" => stage,
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, stage, outcome);
	}
}

/// Records why a refresh or header stamp failed, labeled by [`crate::error::Error::class`].
pub fn record_refresh_failure(kind: RefreshKind, stage: &'static str, class: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"token_session_refresh_failure_total",
			"kind" => kind.as_str(),
			"stage" => stage,
			"class" => class
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, stage, class);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::{Error, FetchError};

	#[test]
	fn recorders_noop_without_a_global_recorder() {
		let err = Error::from(FetchError::Status { status: 401, body_preview: None });

		record_refresh_outcome(RefreshKind::Guard, "authorization_guard", RefreshOutcome::Failure);
		record_refresh_failure(RefreshKind::Guard, "authorization_guard", err.class());
	}
}
