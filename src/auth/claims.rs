//! Unverified claim decoding for JWT-shaped access tokens.
//!
//! The session only reads identity fields and the expiry from the payload segment. Signatures
//! are never checked here; the token service that issued the token is the one that verifies it.

// crates.io
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::de::Error as _;
use serde_json::{Number, Value};
// self
use crate::{_prelude::*, error::DecodeError};

/// Identity claims carried by an access token.
///
/// Only `exp` must be present and numeric. Identity fields accept any JSON scalar and render it as
/// a string; `null` and missing fields become empty strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Display name of the principal.
	#[serde(default, deserialize_with = "deserialize_text")]
	pub name: String,
	/// Expiry in epoch seconds; fractional values are truncated.
	#[serde(deserialize_with = "deserialize_exp")]
	pub exp: i64,
	/// Application role of the principal.
	#[serde(default, deserialize_with = "deserialize_text")]
	pub role: String,
	/// Principal identifier.
	#[serde(default, deserialize_with = "deserialize_text")]
	pub id: String,
}
impl Claims {
	/// Decodes the payload segment of `token` without verifying its signature.
	pub fn decode(token: &str) -> Result<Self, DecodeError> {
		let payload = token
			.split('.')
			.nth(1)
			.filter(|segment| !segment.is_empty())
			.ok_or(DecodeError::MissingPayload)?;
		// Accept the standard alphabet and padded input as well.
		let normalized = payload
			.trim_end_matches('=')
			.chars()
			.map(|c| match c {
				'+' => '-',
				'/' => '_',
				other => other,
			})
			.collect::<String>();
		let bytes = URL_SAFE_NO_PAD
			.decode(normalized)
			.map_err(|source| DecodeError::Base64 { source })?;
		let de = &mut serde_json::Deserializer::from_slice(&bytes);
		let claims: Self =
			serde_path_to_error::deserialize(de).map_err(|source| DecodeError::Claims { source })?;

		claims.expires_at()?;

		Ok(claims)
	}

	/// Converts the `exp` claim into an instant.
	pub fn expires_at(&self) -> Result<OffsetDateTime, DecodeError> {
		OffsetDateTime::from_unix_timestamp(self.exp)
			.map_err(|_| DecodeError::ExpiryOutOfRange { exp: self.exp })
	}
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		None | Some(Value::Null) => String::new(),
		Some(Value::String(text)) => text,
		Some(other) => other.to_string(),
	})
}

fn deserialize_exp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let number = Number::deserialize(deserializer)?;

	if let Some(exp) = number.as_i64() {
		return Ok(exp);
	}

	// Oversized integers and floats both land here.
	match number.as_f64().map(f64::trunc) {
		Some(exp) if exp.is_finite() && exp >= i64::MIN as f64 && exp < i64::MAX as f64 =>
			Ok(exp as i64),
		_ => Err(D::Error::custom(format!("exp {number} does not fit epoch seconds"))),
	}
}
