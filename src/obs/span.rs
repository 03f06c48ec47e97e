// self
use crate::{_prelude::*, obs::RefreshKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedRefresh<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRefresh<F> = F;

/// A span builder used by session refreshes.
#[derive(Clone, Debug)]
pub struct RefreshSpan {
	kind: RefreshKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RefreshSpan {
	/// Creates a new span tagged with the provided refresh kind + stage.
	pub fn new(kind: RefreshKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("token_session.refresh", kind = kind.as_str(), stage);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self { kind }
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRefresh<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Logs a refresh failure inside the span.
	///
	/// Guard failures reject a request and log at `error`; initial-fetch failures are expected
	/// for signed-out users and log at `debug`.
	pub fn log_failure(&self, err: &Error) {
		#[cfg(feature = "tracing")]
		{
			let _entered = self.span.enter();

			match self.kind {
				RefreshKind::Guard => tracing::error!(error = %err, "failed to refresh token"),
				RefreshKind::Initial => tracing::debug!(error = %err, "initial token fetch failed"),
			}
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (self.kind, err);
		}
	}
}
