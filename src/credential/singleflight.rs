//! Per-key deduplication of in-flight credential fetches.
//!
//! Under concurrent load every caller that misses the cache at the same
//! moment would otherwise issue its own request against the platform issuer.
//! The registry keeps one flight per key: the first caller to acquire the
//! flight lock runs the fetch, every later caller queues on the same lock and
//! then reads the stored outcome (value or error) without fetching. Completed
//! flights unregister themselves, so the next miss starts a fresh fetch.

// self
use crate::_prelude::*;

type FlightSlot = Arc<AsyncMutex<Option<Result<String>>>>;

/// Registry of in-flight fetches, keyed by credential namespace.
#[derive(Debug, Default)]
pub(crate) struct Singleflight(Mutex<HashMap<&'static str, FlightSlot>>);
impl Singleflight {
	/// Runs `fetch` under the key's flight, sharing one outcome across all
	/// concurrent callers.
	///
	/// A caller cancelled while waiting leaves the lock queue without
	/// affecting the flight; a cancelled leader hands the flight to the next
	/// waiter, which finds the slot still empty and fetches itself.
	pub(crate) async fn run<F, Fut>(&self, key: &'static str, fetch: F) -> Result<String>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<String>>,
	{
		let flight = {
			let mut flights = self.0.lock();

			flights.entry(key).or_default().clone()
		};
		let mut slot = flight.lock().await;

		if let Some(outcome) = slot.as_ref() {
			return outcome.clone();
		}

		let outcome = fetch().await;

		// No await points between storing the outcome and unregistering, so
		// queued waiters always read this result while new callers start a
		// fresh flight.
		*slot = Some(outcome.clone());
		self.0.lock().remove(key);

		outcome
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;
	use crate::error::Error;

	#[tokio::test]
	async fn concurrent_callers_share_one_fetch() {
		let flights = Singleflight::default();
		let calls = AtomicUsize::new(0);
		let fetch = || async {
			calls.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(std::time::Duration::from_millis(50)).await;

			Ok("tok-shared".to_owned())
		};
		let (first, second, third) = tokio::join!(
			flights.run("AccessToken", fetch),
			flights.run("AccessToken", fetch),
			flights.run("AccessToken", fetch),
		);

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(first.expect("First caller should observe the shared value."), "tok-shared");
		assert_eq!(second.expect("Second caller should observe the shared value."), "tok-shared");
		assert_eq!(third.expect("Third caller should observe the shared value."), "tok-shared");
	}

	#[tokio::test]
	async fn concurrent_callers_share_one_error() {
		let flights = Singleflight::default();
		let calls = AtomicUsize::new(0);
		let fetch = || async {
			calls.fetch_add(1, Ordering::SeqCst);
			tokio::time::sleep(std::time::Duration::from_millis(50)).await;

			Err(Error::Remote { code: 40164, message: "ip not in whitelist".into() })
		};
		let (first, second) =
			tokio::join!(flights.run("AccessToken", fetch), flights.run("AccessToken", fetch));

		assert_eq!(calls.load(Ordering::SeqCst), 1);
		assert_eq!(first, second);
		assert_eq!(
			first.expect_err("Both callers should observe the shared error."),
			Error::Remote { code: 40164, message: "ip not in whitelist".into() },
		);
	}

	#[tokio::test]
	async fn completed_flights_clear_their_key() {
		let flights = Singleflight::default();
		let calls = AtomicUsize::new(0);

		for round in ["tok-1", "tok-2"] {
			let value = flights
				.run("AccessToken", || async {
					calls.fetch_add(1, Ordering::SeqCst);

					Ok(round.to_owned())
				})
				.await
				.expect("Sequential fetches should succeed.");

			assert_eq!(value, round);
		}

		assert_eq!(calls.load(Ordering::SeqCst), 2);
	}

	#[tokio::test]
	async fn distinct_keys_fetch_independently() {
		let flights = Singleflight::default();
		let calls = AtomicUsize::new(0);
		let token = || async {
			calls.fetch_add(1, Ordering::SeqCst);

			Ok("tok".to_owned())
		};
		let ticket = || async {
			calls.fetch_add(1, Ordering::SeqCst);

			Ok("ticket".to_owned())
		};
		let (token, ticket) =
			tokio::join!(flights.run("AccessToken", token), flights.run("JsTicket", ticket));

		assert_eq!(calls.load(Ordering::SeqCst), 2);
		assert_eq!(token.expect("Token flight should succeed."), "tok");
		assert_eq!(ticket.expect("Ticket flight should succeed."), "ticket");
	}
}
