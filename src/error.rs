//! Session-level error types shared across the token source, guard, and client.

// self
use crate::_prelude::*;

/// Session-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical session error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token endpoint could not be reached or answered with an unusable response.
	#[error(transparent)]
	Fetch(#[from] FetchError),
	/// Access token payload could not be decoded into claims.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Guarded request failed after the hooks ran.
	#[error(transparent)]
	Transport(#[from] TransportError),
}
impl Error {
	/// Returns `true` for the failures the session treats as "refresh failed".
	///
	/// Fetch and decode failures are handled identically by the session; the distinction only
	/// exists for diagnostics.
	pub fn is_refresh_failure(&self) -> bool {
		matches!(self, Self::Fetch(_) | Self::Decode(_))
	}

	/// Returns a stable label for the error family, used as a metric label.
	pub const fn class(&self) -> &'static str {
		match self {
			Self::Config(_) => "config",
			Self::Fetch(_) => "fetch",
			Self::Decode(_) => "decode",
			Self::Transport(_) => "transport",
		}
	}
}

/// Configuration and validation failures raised while building a session.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Outgoing request could not be built.
	#[error("HTTP request could not be built.")]
	HttpRequest {
		/// Underlying request builder failure.
		#[source]
		source: BoxError,
	},
	/// Base URL cannot serve as a base for the token path.
	#[error("Base URL `{url}` cannot be used as a base.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Base URL uses a scheme other than HTTP(S).
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// Token path could not be joined onto the base URL.
	#[error("Token path `{path}` is invalid.")]
	InvalidTokenPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Redirect target is empty.
	#[error("The {target} redirect path must not be empty.")]
	EmptyRedirectPath {
		/// Which redirect failed validation.
		target: &'static str,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}

	/// Wraps a request builder failure inside [`ConfigError`].
	pub fn http_request(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpRequest { source: Box::new(src) }
	}
}

/// Failures reaching the token endpoint or reading its response.
#[derive(Debug, ThisError)]
pub enum FetchError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Token endpoint answered with a non-success status.
	#[error("Token endpoint returned HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Leading bytes of the response body, lossily decoded.
		body_preview: Option<String>,
	},
	/// Token endpoint responded with JSON that does not carry an access token.
	#[error("Token endpoint returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
}
impl FetchError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Returns the HTTP status attached to the failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Network { .. } => None,
			Self::Status { status, .. } | Self::ResponseParse { status, .. } => Some(*status),
		}
	}
}
impl From<ReqwestError> for FetchError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

/// Failures turning an access token into claims.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Token has no payload segment.
	#[error("Access token has no payload segment.")]
	MissingPayload,
	/// Payload segment is not valid base64url.
	#[error("Access token payload is not valid base64url.")]
	Base64 {
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// Payload JSON does not match the expected claim shape.
	#[error("Access token payload does not carry the expected claims.")]
	Claims {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// The `exp` claim lies outside the representable range.
	#[error("The exp claim {exp} is out of range.")]
	ExpiryOutOfRange {
		/// Raw `exp` value.
		exp: i64,
	},
}

/// Transport-level failures raised while sending a guarded request.
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while sending the guarded request.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
