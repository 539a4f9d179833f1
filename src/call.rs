//! Bound-call execution: credential injection with a single forced-reload retry.

// self
use crate::{
	_prelude::*,
	client::Client,
	obs::{self, CallKind, CallOutcome, CallSpan},
};

/// Per-call behavior knobs for [`Client::with_access_token`].
///
/// A retry attempt derives a new value with `retryable` cleared and `reload`
/// set, so no logical call can ever run more than two attempts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CallOptions {
	/// Allows one forced-reload retry after a stale-credential failure.
	pub retryable: bool,
	/// Forces a fresh credential for the first attempt.
	pub reload: bool,
}
impl CallOptions {
	/// Creates the default options: retryable, serving credentials from cache.
	pub const fn new() -> Self {
		Self { retryable: true, reload: false }
	}

	/// Overrides whether a stale-credential failure may retry.
	pub const fn with_retryable(mut self, retryable: bool) -> Self {
		self.retryable = retryable;

		self
	}

	/// Overrides whether the first attempt forces a fresh credential.
	pub const fn with_reload(mut self, reload: bool) -> Self {
		self.reload = reload;

		self
	}

	const fn retry(self) -> Self {
		Self { retryable: false, reload: true }
	}
}
impl Default for CallOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl Client {
	/// Runs `task` with a valid access token, retrying once on a stale credential.
	///
	/// The task receives the current token and reports its outcome through the
	/// crate's error classification. When the platform rejects the presented
	/// token as stale and the options allow it, the executor forces one
	/// credential reload and reruns the task; every other failure, including a
	/// failed credential fetch, surfaces immediately.
	pub async fn with_access_token<T, F, Fut>(&self, options: CallOptions, task: F) -> Result<T>
	where
		F: Fn(String) -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		const KIND: CallKind = CallKind::BoundCall;

		let span = CallSpan::new(KIND, "with_access_token");

		obs::record_call_outcome(KIND, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let mut options = options;

				// Bounded by construction: the retry derivation clears
				// `retryable`, so the loop body runs at most twice.
				loop {
					let token = self.access_token(options.reload).await?;

					match task(token).await {
						Err(Error::Stale(_)) if options.retryable => {
							obs::record_call_outcome(KIND, CallOutcome::StaleRetry);

							options = options.retry();
						},
						outcome => return outcome,
					}
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(KIND, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(KIND, CallOutcome::Failure),
		}

		result
	}
}
