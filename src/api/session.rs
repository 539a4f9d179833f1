//! Login-code and web-OAuth session exchanges.

// self
use crate::{_prelude::*, client::Client};

/// Session established from a Mini Program login code.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SessionInfo {
	/// User identifier scoped to the application.
	pub openid: String,
	/// Session key used to verify and decrypt user-data payloads.
	pub session_key: String,
	/// User identifier scoped to the platform account, when available.
	pub unionid: String,
}

/// Token bundle returned by the web OAuth code exchange.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WebOauthToken {
	/// OAuth access token scoped to the authorizing user.
	pub access_token: String,
	/// Validity window in seconds.
	pub expires_in: i64,
	/// Refresh token for extending the session.
	pub refresh_token: String,
	/// User identifier scoped to the application.
	pub openid: String,
	/// Granted scope list.
	pub scope: String,
	/// Non-zero when the user authorized in snapshot mode.
	pub is_snapshotuser: i64,
	/// User identifier scoped to the platform account, when available.
	pub unionid: String,
}

impl Client {
	/// Exchanges a Mini Program login code for a user session.
	///
	/// Authenticates with the application identity directly; no cached
	/// credential is involved.
	pub async fn code_to_session(&self, code: &str) -> Result<SessionInfo> {
		self.http
			.get("/sns/jscode2session", &[
				("appid", self.config.app_id.as_str()),
				("secret", self.config.app_secret.as_str()),
				("js_code", code),
				("grant_type", "authorization_code"),
			])
			.await
	}

	/// Exchanges a web OAuth authorization code for a user-scoped token.
	pub async fn web_oauth_token(&self, code: &str) -> Result<WebOauthToken> {
		self.http
			.get("/sns/oauth2/access_token", &[
				("appid", self.config.app_id.as_str()),
				("secret", self.config.app_secret.as_str()),
				("code", code),
				("grant_type", "authorization_code"),
			])
			.await
	}
}
