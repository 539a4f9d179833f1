//! Storage contracts and the built-in credential store implementation.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::_prelude::*;

/// Boxed future returned by [`CredentialStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Cache contract consumed by the credential provider.
///
/// Implementations own expiry entirely: an entry past its TTL must read back
/// as absent. A `get` failure is a hard failure of the calling operation, so
/// backends must not degrade errors into misses.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Fetches the unexpired value cached under `key`, if any.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Persists `value` under `key` for the provided TTL, replacing any entry.
	fn put<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
