//! Client-level error types shared across the credential provider, executor, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical client error exposed by public APIs.
///
/// Every variant owns its payload and is cloneable, so a deduplicated
/// credential fetch can hand each concurrent caller an identical copy of the
/// single in-flight outcome.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Store(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (network, malformed body, unexpected status).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Platform rejected the presented credential; a forced refetch may recover.
	#[error(transparent)]
	Stale(#[from] StaleCredential),
	/// Any other non-zero platform error code, payload preserved verbatim.
	#[error("Platform returned error {code}: {message}.")]
	Remote {
		/// Numeric error code reported by the platform.
		code: i64,
		/// Error message reported by the platform.
		message: String,
	},
}
impl Error {
	/// Returns `true` when a forced credential reload may recover the call.
	pub fn is_stale_credential(&self) -> bool {
		matches!(self, Self::Stale(_))
	}
}

/// Closed set of platform conditions indicating the presented credential is unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
pub enum StaleCredential {
	/// Code 40001: the credential, or the secret used to mint it, was rejected.
	#[error("Platform rejected the credential as invalid.")]
	Invalid,
	/// Code 42001: the credential passed its expiry on the platform side.
	#[error("Platform reported the credential as expired.")]
	Expired,
	/// Code 40014: the credential is malformed for the requested use.
	#[error("Platform rejected the credential as malformed.")]
	Malformed,
}
impl StaleCredential {
	const CODE_EXPIRED: i64 = 42001;
	const CODE_INVALID: i64 = 40001;
	const CODE_MALFORMED: i64 = 40014;

	/// Maps a platform error code onto the stale-credential table, if present.
	pub fn from_code(code: i64) -> Option<Self> {
		match code {
			Self::CODE_INVALID => Some(Self::Invalid),
			Self::CODE_EXPIRED => Some(Self::Expired),
			Self::CODE_MALFORMED => Some(Self::Malformed),
			_ => None,
		}
	}

	/// Returns the platform error code behind this condition.
	pub const fn code(self) -> i64 {
		match self {
			Self::Invalid => Self::CODE_INVALID,
			Self::Expired => Self::CODE_EXPIRED,
			Self::Malformed => Self::CODE_MALFORMED,
		}
	}
}

/// Classifies a platform `errcode`/`errmsg` pair.
///
/// Zero means success. The closed stale set maps to [`StaleCredential`]; every
/// other code surfaces as [`Error::Remote`] with the payload untouched so
/// callers can inspect the original diagnostics.
pub(crate) fn check_remote_code(code: i64, message: &str) -> Result<()> {
	if code == 0 {
		return Ok(());
	}
	if let Some(stale) = StaleCredential::from_code(code) {
		return Err(stale.into());
	}

	Err(Error::Remote { code, message: message.to_owned() })
}

/// Configuration and validation failures raised while building the client.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed: {message}.")]
	HttpClientBuild {
		/// Transport builder failure, flattened to text.
		message: String,
	},
	/// Endpoint base URL cannot be extended with a request path.
	#[error("Endpoint URL cannot be joined with `{path}`.")]
	InvalidEndpoint {
		/// Request path that failed to join.
		path: String,
	},
	/// Proxy URL was rejected by the transport.
	#[error("Proxy URL is invalid: {message}.")]
	InvalidProxy {
		/// Transport failure, flattened to text.
		message: String,
	},
}

/// Transport-level failures (network, body decoding, status handling).
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the platform: {message}.")]
	Network {
		/// Transport-specific failure, flattened to text.
		message: String,
	},
	/// Response body could not be decoded into the expected shape.
	#[error("Platform returned a malformed response body: {message}.")]
	Decode {
		/// Path-qualified deserialization failure, flattened to text.
		message: String,
		/// HTTP status code of the offending response.
		status: u16,
	},
	/// Response status was neither a success nor a classifiable error payload.
	#[error("Platform returned an unexpected HTTP status {status}.")]
	UnexpectedStatus {
		/// HTTP status code of the response.
		status: u16,
	},
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		// Issuance URLs carry the application secret as a query parameter, so
		// the URL must never reach the error text.
		Self::Network { message: e.without_url().to_string() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn classification_table_is_closed() {
		assert_eq!(check_remote_code(40001, "invalid credential"), Err(StaleCredential::Invalid.into()));
		assert_eq!(check_remote_code(42001, "access_token expired"), Err(StaleCredential::Expired.into()));
		assert_eq!(check_remote_code(40014, "invalid access_token"), Err(StaleCredential::Malformed.into()));
	}

	#[test]
	fn zero_code_means_success() {
		assert_eq!(check_remote_code(0, "ok"), Ok(()));
	}

	#[test]
	fn unlisted_codes_keep_their_payload() {
		let err = check_remote_code(40125, "invalid appsecret")
			.expect_err("Non-zero codes outside the stale table should surface as remote errors.");

		assert_eq!(err, Error::Remote { code: 40125, message: "invalid appsecret".into() });
		assert!(!err.is_stale_credential());
		assert!(err.to_string().contains("invalid appsecret"));
	}

	#[test]
	fn stale_codes_round_trip() {
		for code in [40001, 42001, 40014] {
			let stale = StaleCredential::from_code(code)
				.expect("Every code in the stale table should map to a condition.");

			assert_eq!(stale.code(), code);
			assert!(Error::from(stale).is_stale_credential());
		}

		assert_eq!(StaleCredential::from_code(48001), None);
	}
}
