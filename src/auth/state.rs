//! In-memory session state and its lifecycle status.

// self
use crate::{
	_prelude::*,
	auth::{Claims, TokenSecret},
	error::DecodeError,
};

/// Lifecycle status of a session at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
	/// Token is present and its expiry has not passed.
	Valid,
	/// Token expired or was never fetched.
	Expired,
}

/// Access token plus the identity claims decoded from it.
///
/// `token` and `expires_at` always originate from the same token: the only constructor reads
/// both from one decoded response, and [`SessionState::default`] pairs the empty token with the
/// Unix epoch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
	/// Current access token; empty when absent.
	pub token: TokenSecret,
	/// Expiry instant taken from the token's `exp` claim.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
	/// Display name claim.
	pub display_name: String,
	/// Role claim.
	pub role: String,
	/// User identifier claim.
	pub user_id: String,
}
impl SessionState {
	/// Decodes `token` and builds the state it describes.
	pub fn from_token(token: TokenSecret) -> Result<Self, DecodeError> {
		let claims = Claims::decode(token.expose())?;
		let expires_at = claims.expires_at()?;

		Ok(Self {
			token,
			expires_at,
			display_name: claims.name,
			role: claims.role,
			user_id: claims.id,
		})
	}

	/// Computes the status at a given instant.
	///
	/// The session only counts as expired once `now` is strictly past the expiry.
	pub fn status_at(&self, now: OffsetDateTime) -> SessionStatus {
		if self.expires_at < now {
			SessionStatus::Expired
		} else {
			SessionStatus::Valid
		}
	}

	/// Convenience helper that checks the status using the current UTC instant.
	pub fn status(&self) -> SessionStatus {
		self.status_at(OffsetDateTime::now_utc())
	}

	/// Returns `true` if the session is expired or absent at the provided instant.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		matches!(self.status_at(now), SessionStatus::Expired)
	}

	/// Drops the token and its expiry together, keeping the identity fields.
	pub fn clear_token(&mut self) {
		self.token = TokenSecret::default();
		self.expires_at = OffsetDateTime::UNIX_EPOCH;
	}
}
impl Default for SessionState {
	fn default() -> Self {
		Self {
			token: TokenSecret::default(),
			expires_at: OffsetDateTime::UNIX_EPOCH,
			display_name: String::new(),
			role: String::new(),
			user_id: String::new(),
		}
	}
}
