//! Optional observability helpers for gate flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `authority_gate.flow` with the
//!   `flow` and `stage` fields, plus debug/warn events for passthrough results and swallowed
//!   failures.
//! - Enable `metrics` to increment the `authority_gate_flow_total` counter for every
//!   attempt/success/denial/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Domain lookup and settings snapshot.
	DomainLookup,
	/// Credential authentication, internal and passthrough.
	Authenticate,
	/// Passthrough resource selection.
	Passthrough,
	/// Entitlement resolution.
	Entitlements,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::DomainLookup => "domain_lookup",
			FlowKind::Authenticate => "authenticate",
			FlowKind::Passthrough => "passthrough",
			FlowKind::Entitlements => "entitlements",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a gate operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Completed with a refusal (unknown identity, suspension, status, bad credential).
	Denied,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Denied => "denied",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
