// self
use crate::{
	_prelude::*,
	auth::{DomainKey, ResourceKey},
	error::{ConnectorError, CredentialError},
	obs::FlowKind,
	store::StoreError,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedFlow<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedFlow<F> = F;

/// A span builder used by gate flows.
#[derive(Clone, Debug)]
pub struct FlowSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	/// Creates a new span tagged with the provided flow kind + stage.
	pub fn new(kind: FlowKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("authority_gate.flow", flow = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> FlowSpanGuard {
		#[cfg(feature = "tracing")]
		{
			FlowSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			FlowSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedFlow<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`FlowSpan::entered`].
pub struct FlowSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for FlowSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("FlowSpanGuard(..)")
	}
}

/// Logs the result of internal credential verification.
pub fn log_internal_verification(username: &str, matched: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(username, matched, "Verified credential against the stored digest.");
	#[cfg(not(feature = "tracing"))]
	let _ = (username, matched);
}

/// Logs a stored digest that could not be decoded; the attempt is treated as a mismatch.
pub fn log_malformed_digest(username: &str, error: &CredentialError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(username, error = %error, "Stored password digest is malformed.");
	#[cfg(not(feature = "tracing"))]
	let _ = (username, error);
}

/// Logs a passthrough resource that answered without error.
pub fn log_passthrough_result(resource: &ResourceKey, authenticated: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(resource = %resource, authenticated, "Passthrough resource answered.");
	#[cfg(not(feature = "tracing"))]
	let _ = (resource, authenticated);
}

/// Logs a passthrough resource failure; the loop moves on to the next resource.
pub fn log_passthrough_error(error: &ConnectorError) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		resource = %error.resource(),
		error = %error,
		"Passthrough resource failed, trying the next one."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = error;
}

/// Logs a policy-listed resource key with no registered resource.
pub fn log_unresolved_resource(domain: &DomainKey, resource: &ResourceKey) {
	#[cfg(feature = "tracing")]
	tracing::warn!(domain = %domain, resource = %resource, "Account policy names an unknown resource.");
	#[cfg(not(feature = "tracing"))]
	let _ = (domain, resource);
}

/// Logs an audit sink failure; the audited outcome is unaffected.
pub fn log_audit_failure(event: &str, error: &StoreError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(event, error = %error, "Failed to record audit event.");
	#[cfg(not(feature = "tracing"))]
	let _ = (event, error);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn flow_span_guard_exists_with_or_without_tracing() {
		let _guard = FlowSpan::new(FlowKind::Entitlements, "test").entered();
	}

	#[test]
	fn log_helpers_accept_every_payload() {
		let resource = ResourceKey::new("resource-ldap").expect("Resource fixture should be valid.");

		log_internal_verification("verdi", false);
		log_malformed_digest("verdi", &CredentialError::Truncated);
		log_passthrough_result(&resource, true);
		log_passthrough_error(&ConnectorError::Rejected {
			resource: resource.clone(),
			message: "locked".into(),
		});
		log_unresolved_resource(&DomainKey::master(), &resource);
		log_audit_failure("authenticate", &StoreError::Backend { message: "down".into() });
	}

	#[cfg(feature = "tracing")]
	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = FlowSpan::new(FlowKind::Authenticate, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
