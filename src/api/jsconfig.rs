//! JS-SDK bootstrap configuration and request signing.

// std
use std::fmt::Write as _;
// crates.io
use rand::{Rng, distr::Alphanumeric};
use sha1::{Digest, Sha1};
// self
use crate::{_prelude::*, client::Client};

const NONCE_LEN: usize = 16;

/// Signed parameters required to initialize the platform's in-page SDK.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsSdkConfig {
	/// Application identifier issued by the platform.
	pub app_id: String,
	/// Unix timestamp the signature was computed at, as a decimal string.
	pub timestamp: String,
	/// Random nonce bound into the signature.
	pub nonce_str: String,
	/// Hex-encoded signature over the ticket, nonce, timestamp, and URL.
	pub signature: String,
}

impl Client {
	/// Produces the signed SDK bootstrap for the exact page URL.
	///
	/// Borrows a valid JS-SDK ticket through the credential provider and signs
	/// it together with a fresh nonce and the current timestamp. The URL must
	/// match the page invoking the SDK, fragment excluded.
	pub async fn js_sdk_config(&self, url: &str) -> Result<JsSdkConfig> {
		let ticket = self.js_ticket(false).await?;
		let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
		let nonce = random_nonce(NONCE_LEN);
		let signature = sign_params(&[
			("jsapi_ticket", ticket.as_str()),
			("noncestr", nonce.as_str()),
			("timestamp", timestamp.as_str()),
			("url", url),
		]);

		Ok(JsSdkConfig {
			app_id: self.config.app_id.clone(),
			timestamp,
			nonce_str: nonce,
			signature,
		})
	}
}

fn random_nonce(len: usize) -> String {
	rand::rng().sample_iter(Alphanumeric).take(len).map(char::from).collect()
}

/// Signs SDK parameters the way the platform verifies them: `key=value` pairs
/// sorted lexicographically, joined with `&`, digested with SHA-1, and
/// hex-encoded. The exact byte layout is part of the platform protocol.
fn sign_params(params: &[(&str, &str)]) -> String {
	let mut pairs: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();

	pairs.sort();

	let digest = Sha1::digest(pairs.join("&").as_bytes());

	digest.iter().fold(String::with_capacity(digest.len() * 2), |mut hex, byte| {
		let _ = write!(hex, "{byte:02x}");

		hex
	})
}
