//! Client aggregate wiring configuration, transport, store, and flight registry.

// self
use crate::{
	_prelude::*,
	config::Config,
	credential::singleflight::Singleflight,
	http::HttpClient,
	store::CredentialStore,
};

/// Platform client coordinating the credential lifecycle and protected calls.
///
/// Cloning is cheap; clones share the same store, transport, and flight
/// registry, so fetch deduplication spans every clone of one client.
#[derive(Clone)]
pub struct Client {
	pub(crate) config: Config,
	pub(crate) http: HttpClient,
	pub(crate) store: Arc<dyn CredentialStore>,
	pub(crate) flights: Arc<Singleflight>,
}
impl Client {
	/// Creates a client over the provided configuration and credential store.
	pub fn new(config: Config, store: Arc<dyn CredentialStore>) -> Result<Self> {
		let http = HttpClient::new(&config)?;

		Ok(Self { config, http, store, flights: Default::default() })
	}

	/// Returns the configuration this client was built with.
	pub fn config(&self) -> &Config {
		&self.config
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client").field("config", &self.config).finish()
	}
}
