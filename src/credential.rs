//! Credential lifecycle: cache-aware fetch, deduplication, and expiry-margin bookkeeping.

pub(crate) mod singleflight;

// self
use crate::{
	_prelude::*,
	client::Client,
	obs::{self, CallOutcome, CallSpan},
};

/// Safety margin subtracted from issuer-reported TTLs before caching.
///
/// A credential is never served from cache within this window of its true
/// expiry, so a call started on a cache hit cannot present a value the
/// platform is already rejecting.
pub const SAFETY_MARGIN: Duration = Duration::seconds(2);

/// Kinds of platform credential managed by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CredentialKind {
	/// Primary access token minted from the application identity.
	AccessToken,
	/// JS-SDK ticket derived from a valid access token.
	JsTicket,
}
impl CredentialKind {
	/// Returns the fixed store and flight namespace for this kind.
	pub const fn cache_key(self) -> &'static str {
		match self {
			CredentialKind::AccessToken => "AccessToken",
			CredentialKind::JsTicket => "JsTicket",
		}
	}
}

/// Credential value and validity window reported by an issuance response.
#[derive(Clone, Debug)]
pub(crate) struct IssuedCredential {
	pub(crate) value: String,
	pub(crate) expires_in: i64,
}
impl IssuedCredential {
	/// Computes the margin-adjusted TTL used for caching; never negative.
	pub(crate) fn cache_ttl(&self) -> Duration {
		Duration::seconds((self.expires_in - SAFETY_MARGIN.whole_seconds()).max(0))
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AccessTokenGrant {
	access_token: String,
	expires_in: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TicketGrant {
	ticket: String,
	expires_in: i64,
}

impl Client {
	/// Returns a valid access token, fetching through the issuer on a miss.
	///
	/// `reload` bypasses the cache and forces a fresh issuance. Concurrent
	/// fetches collapse into one platform request per credential kind, and the
	/// issued value is re-cached with its TTL shortened by [`SAFETY_MARGIN`].
	pub async fn access_token(&self, reload: bool) -> Result<String> {
		self.credential_flow(CredentialKind::AccessToken, reload, || self.fetch_access_token())
			.await
	}

	/// Returns a valid JS-SDK ticket, fetching through the issuer on a miss.
	///
	/// The ticket issuance authenticates with an access token obtained through
	/// [`Client::access_token`], which may itself hit the cache or join an
	/// in-flight fetch.
	pub async fn js_ticket(&self, reload: bool) -> Result<String> {
		self.credential_flow(CredentialKind::JsTicket, reload, || self.fetch_js_ticket()).await
	}

	/// Shared cache-then-singleflight flow behind both credential kinds.
	///
	/// Generic over the issuance future so the ticket flow can nest the token
	/// flow without the two futures containing each other.
	async fn credential_flow<F, Fut>(&self, kind: CredentialKind, reload: bool, fetch: F) -> Result<String>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<IssuedCredential>>,
	{
		let span = CallSpan::new(kind.into(), "credential");

		obs::record_call_outcome(kind.into(), CallOutcome::Attempt);

		let result = span
			.instrument(async move {
				let key = kind.cache_key();

				if !reload {
					if let Some(value) = self.store.get(key).await? {
						return Ok(value);
					}
				}

				self.flights
					.run(key, || async move {
						let issued = fetch().await?;

						// An issued credential stays usable even when caching
						// it fails.
						if let Err(e) =
							self.store.put(key, &issued.value, issued.cache_ttl()).await
						{
							obs::record_cache_write_failure(kind, &e);
						}

						Ok(issued.value)
					})
					.await
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(kind.into(), CallOutcome::Success),
			Err(_) => obs::record_call_outcome(kind.into(), CallOutcome::Failure),
		}

		result
	}

	async fn fetch_access_token(&self) -> Result<IssuedCredential> {
		let grant: AccessTokenGrant = self
			.http
			.get("/cgi-bin/token", &[
				("grant_type", "client_credential"),
				("appid", self.config.app_id.as_str()),
				("secret", self.config.app_secret.as_str()),
			])
			.await?;

		Ok(IssuedCredential { value: grant.access_token, expires_in: grant.expires_in })
	}

	async fn fetch_js_ticket(&self) -> Result<IssuedCredential> {
		let token = self.access_token(false).await?;
		let grant: TicketGrant = self
			.http
			.get("/cgi-bin/ticket/getticket", &[
				("access_token", token.as_str()),
				("type", "jsapi"),
			])
			.await?;

		Ok(IssuedCredential { value: grant.ticket, expires_in: grant.expires_in })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn cache_keys_are_fixed_per_kind() {
		assert_eq!(CredentialKind::AccessToken.cache_key(), "AccessToken");
		assert_eq!(CredentialKind::JsTicket.cache_key(), "JsTicket");
	}

	#[test]
	fn cache_ttl_applies_the_safety_margin() {
		let issued = IssuedCredential { value: "tok".into(), expires_in: 7200 };

		assert_eq!(issued.cache_ttl(), Duration::seconds(7198));
	}

	#[test]
	fn cache_ttl_never_goes_negative() {
		for expires_in in [2, 1, 0, -5] {
			let issued = IssuedCredential { value: "tok".into(), expires_in };

			assert_eq!(issued.cache_ttl(), Duration::ZERO);
		}

		let issued = IssuedCredential { value: "tok".into(), expires_in: 3 };

		assert_eq!(issued.cache_ttl(), Duration::seconds(1));
	}
}
