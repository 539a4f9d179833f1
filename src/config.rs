//! Application identity and deployment-environment configuration.

// self
use crate::_prelude::*;

/// Deployment environment of a Mini Program integration.
///
/// The platform distinguishes the released program from its trial and
/// development builds; collaborator payloads embed the environment when the
/// platform expects it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MiniAppEnv {
	/// Production release channel.
	#[default]
	Release,
	/// Staging/trial channel.
	Trial,
	/// Development channel.
	Develop,
}
impl MiniAppEnv {
	/// Returns the stable environment label used in payloads and logs.
	pub const fn as_str(self) -> &'static str {
		match self {
			MiniAppEnv::Release => "release",
			MiniAppEnv::Trial => "trial",
			MiniAppEnv::Develop => "develop",
		}
	}

	/// Maps the environment onto the platform's subscribe-message state vocabulary.
	pub const fn miniprogram_state(self) -> &'static str {
		match self {
			MiniAppEnv::Release => "formal",
			MiniAppEnv::Trial => "trial",
			MiniAppEnv::Develop => "developer",
		}
	}
}
impl Display for MiniAppEnv {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Static configuration for one Mini Program application.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
	/// Application identifier issued by the platform.
	pub app_id: String,
	/// Application secret used to mint access tokens; keep out of logs.
	pub app_secret: String,
	/// Deployment environment; defaults to [`MiniAppEnv::Release`].
	#[serde(default)]
	pub env: MiniAppEnv,
	/// Optional outbound proxy applied to every platform call.
	#[serde(default)]
	pub proxy: Option<Url>,
	/// Platform base endpoint override; `None` selects the production platform.
	#[serde(default)]
	pub endpoint: Option<Url>,
}
impl Config {
	/// Creates a release-environment configuration for the provided identity.
	pub fn new(app_id: impl Into<String>, app_secret: impl Into<String>) -> Self {
		Self {
			app_id: app_id.into(),
			app_secret: app_secret.into(),
			env: MiniAppEnv::default(),
			proxy: None,
			endpoint: None,
		}
	}

	/// Overrides the deployment environment.
	pub fn with_env(mut self, env: MiniAppEnv) -> Self {
		self.env = env;

		self
	}

	/// Routes outbound platform calls through the provided proxy.
	pub fn with_proxy(mut self, proxy: Url) -> Self {
		self.proxy = Some(proxy);

		self
	}

	/// Overrides the platform base endpoint.
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = Some(endpoint);

		self
	}
}
impl Debug for Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Config")
			.field("app_id", &self.app_id)
			.field("app_secret", &"<redacted>")
			.field("env", &self.env)
			.field("proxy", &self.proxy)
			.field("endpoint", &self.endpoint)
			.finish()
	}
}
