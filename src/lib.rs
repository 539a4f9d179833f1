//! Rust's turnkey WeChat Mini Program client - cached credential lifecycle, singleflight token
//! refresh, and classified platform errors in one crate built for production.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod call;
pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod http;
pub mod obs;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		client::Client,
		config::Config,
		store::{CredentialStore, MemoryStore, StoreError, StoreFuture},
	};

	/// Store decorator that records every write so tests can assert cached
	/// values and margin-adjusted TTLs.
	#[derive(Debug, Default)]
	pub struct RecordingStore {
		inner: MemoryStore,
		puts: Mutex<Vec<(String, String, Duration)>>,
	}
	impl RecordingStore {
		/// Returns every `(key, value, ttl)` write observed so far.
		pub fn puts(&self) -> Vec<(String, String, Duration)> {
			self.puts.lock().clone()
		}

		/// Seeds the underlying store directly, bypassing the recorder.
		pub async fn seed(&self, key: &str, value: &str, ttl: Duration) -> Result<(), StoreError> {
			self.inner.put(key, value, ttl).await
		}
	}
	impl CredentialStore for RecordingStore {
		fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
			self.inner.get(key)
		}

		fn put<'a>(&'a self, key: &'a str, value: &'a str, ttl: Duration) -> StoreFuture<'a, ()> {
			self.puts.lock().push((key.into(), value.into(), ttl));

			self.inner.put(key, value, ttl)
		}
	}

	/// Builds a client pointed at a mock platform endpoint, exposing the
	/// recording store backing it.
	pub fn build_test_client(endpoint: &str) -> (Client, Arc<RecordingStore>) {
		let store_backend = Arc::new(RecordingStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let config = Config::new("test-app-id", "test-app-secret")
			.with_endpoint(Url::parse(endpoint).expect("Test endpoint should be a valid URL."));
		let client =
			Client::new(config, store).expect("Test client should build over the mock endpoint.");

		(client, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use serde_json;
pub use time;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _};
