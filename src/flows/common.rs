//! Shared helpers for flow implementations (attempt guards, audit emission).

// self
use crate::{
	_prelude::*,
	audit::AuditEvent,
	auth::DomainKey,
	flows::Gate,
	obs,
};

/// Returns (and creates on demand) the attempt guard for a username in a domain.
pub(crate) fn attempt_guard(gate: &Gate, domain: &DomainKey, username: &str) -> Arc<AsyncMutex<()>> {
	let mut guards = gate.attempt_guards.lock();

	guards
		.entry((domain.clone(), username.to_owned()))
		.or_insert_with(|| Arc::new(AsyncMutex::new(())))
		.clone()
}

/// Hands `event` to the audit sink, logging and swallowing sink failures.
pub(crate) async fn emit_audit(gate: &Gate, event: AuditEvent) {
	let name = event.event.clone();

	if let Err(e) = gate.collaborators.audit.record(event).await {
		obs::log_audit_failure(&name, &e);
	}
}
