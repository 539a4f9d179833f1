//! Optional observability helpers for client calls.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `miniapp_broker.call` with the `call` (kind)
//!   and `stage` (call site) fields, plus warn-level events when a best-effort credential cache
//!   write fails.
//! - Enable `metrics` to increment the `miniapp_broker_call_total` counter for every
//!   attempt/success/failure/stale_retry, labeled by `call` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::{_prelude::*, credential::CredentialKind};

/// Call kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallKind {
	/// Access token issuance and cache lookups.
	AccessToken,
	/// JS-SDK ticket issuance and cache lookups.
	JsTicket,
	/// Protected-endpoint call running through the executor.
	BoundCall,
}
impl CallKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallKind::AccessToken => "access_token",
			CallKind::JsTicket => "js_ticket",
			CallKind::BoundCall => "bound_call",
		}
	}
}
impl Display for CallKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<CredentialKind> for CallKind {
	fn from(kind: CredentialKind) -> Self {
		match kind {
			CredentialKind::AccessToken => CallKind::AccessToken,
			CredentialKind::JsTicket => CallKind::JsTicket,
		}
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// Stale-credential failure recovered by the executor's single retry.
	StaleRetry,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::StaleRetry => "stale_retry",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
