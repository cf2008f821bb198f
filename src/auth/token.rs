//! Cached bearer tokens and the redacting secret wrapper.

// self
use crate::_prelude::*;

/// Seconds shaved off the server-reported lifetime so tokens are renewed before they lapse.
pub const EXPIRY_BUFFER: Duration = Duration::seconds(60);

const FINGERPRINT_MIN_LEN: usize = 16;

/// Bearer or refresh token as issued by the login endpoint.
///
/// Formatting never prints the token. [`TokenSecret::fingerprint`] gives a short tag that lets
/// log lines from different requests be matched to the same cached entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Raw token for the `Authorization` header or a cookie. Never log it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Length and, for tokens long enough to keep it meaningless, the last four characters.
	pub fn fingerprint(&self) -> String {
		let len = self.0.chars().count();

		if len < FINGERPRINT_MIN_LEN {
			return format!("{len} chars");
		}

		let tail = self.0.chars().skip(len - 4).collect::<String>();

		format!("{len} chars, ...{tail}")
	}

	/// Borrows an optional secret as the `Option<&str>` every client call takes.
	pub fn bearer(token: Option<&Self>) -> Option<&str> {
		token.map(Self::expose)
	}
}
impl From<String> for TokenSecret {
	fn from(value: String) -> Self {
		Self(value)
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "TokenSecret(<redacted; {}>)", self.fingerprint())
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Token cache entry for one credential identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedToken {
	/// Bearer access token.
	pub access_token: TokenSecret,
	/// Refresh token, when the backend returned one.
	pub refresh_token: Option<TokenSecret>,
	/// Instant after which the entry must not be served.
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Builds an entry from a login response observed at `issued_at`.
	///
	/// The expiry is `issued_at + expires_in - EXPIRY_BUFFER`, clamped so it never precedes
	/// `issued_at`.
	pub fn from_lifetime(
		access_token: impl Into<String>,
		refresh_token: Option<String>,
		expires_in_secs: i64,
		issued_at: OffsetDateTime,
	) -> Self {
		let lifetime = (Duration::seconds(expires_in_secs) - EXPIRY_BUFFER).max(Duration::ZERO);

		Self {
			access_token: TokenSecret::new(access_token),
			refresh_token: refresh_token.map(TokenSecret::new),
			expires_at: issued_at + lifetime,
		}
	}

	/// Returns true once `now` reaches the stored expiry.
	pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
		now >= self.expires_at
	}

	/// Convenience wrapper using the current UTC time.
	pub fn is_expired(&self) -> bool {
		self.is_expired_at(OffsetDateTime::now_utc())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn formatting_never_prints_the_token() {
		let short = TokenSecret::new("super-secret");
		let jwt = TokenSecret::from("eyJhbGciOiJIUzI1NiJ9.payload.sig-Xy7q".to_owned());

		assert_eq!(format!("{short:?}"), "TokenSecret(<redacted; 12 chars>)");
		assert_eq!(format!("{short}"), "<redacted>");
		assert_eq!(jwt.fingerprint(), "37 chars, ...Xy7q");
		assert!(!format!("{jwt:?}").contains("payload"));
		assert_eq!(TokenSecret::bearer(Some(&short)), Some("super-secret"));
		assert_eq!(TokenSecret::bearer(None), None);
	}

	#[test]
	fn expiry_applies_buffer() {
		let issued = datetime!(2025-01-01 00:00 UTC);
		let token = CachedToken::from_lifetime("a", None, 3_600, issued);

		assert_eq!(token.expires_at, issued + Duration::seconds(3_540));
		assert!(!token.is_expired_at(issued + Duration::seconds(3_539)));
		assert!(token.is_expired_at(issued + Duration::seconds(3_540)));
	}

	#[test]
	fn short_lifetimes_expire_immediately() {
		let issued = datetime!(2025-01-01 00:00 UTC);

		assert!(CachedToken::from_lifetime("a", None, 30, issued).is_expired_at(issued));
		assert!(CachedToken::from_lifetime("a", None, 0, issued).is_expired_at(issued));
	}
}
