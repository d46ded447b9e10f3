//! Audit trail contract plus in-memory and tracing-backed sinks.

// crates.io
use serde_json::Value;
// self
use crate::{_prelude::*, model::Identity, store::StoreError};

/// Boxed future returned by [`AuditSink::record`].
pub type AuditFuture<'a> = Pin<Box<dyn Future<Output = Result<(), StoreError>> + 'a + Send>>;

/// Destination for audit events emitted by the gate.
///
/// Failures are logged by the caller and never change the outcome of the audited operation.
pub trait AuditSink
where
	Self: Send + Sync,
{
	/// Records a single event.
	fn record(&self, event: AuditEvent) -> AuditFuture<'_>;
}

/// Category of audited operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
	/// Credential verification against the internal store or passthrough resources.
	Authentication,
	/// Entitlement resolution for a username.
	Authorization,
}
impl AuditKind {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditKind::Authentication => "authentication",
			AuditKind::Authorization => "authorization",
		}
	}
}
impl Display for AuditKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Final result of the audited operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
	/// The operation succeeded.
	Success,
	/// The operation failed or the credential was rejected.
	Failure,
	/// The identity is suspended.
	Suspended,
	/// The identity's status is outside the domain allow-list.
	Disallowed,
}
impl AuditOutcome {
	/// Maps a boolean result onto an outcome.
	pub const fn from_success(success: bool) -> Self {
		if success { AuditOutcome::Success } else { AuditOutcome::Failure }
	}

	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuditOutcome::Success => "success",
			AuditOutcome::Failure => "failure",
			AuditOutcome::Suspended => "suspended",
			AuditOutcome::Disallowed => "disallowed",
		}
	}
}
impl Display for AuditOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Single audit record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
	/// Category of audited operation.
	pub kind: AuditKind,
	/// Component that emitted the event.
	pub category: String,
	/// Operation name.
	pub event: String,
	/// Final result.
	pub outcome: AuditOutcome,
	/// Username the operation concerned, when known.
	pub identity: Option<String>,
	/// Record state before the operation.
	pub before: Option<Value>,
	/// Operation output.
	pub output: Option<Value>,
	/// Free-form explanation, e.g. a denial reason.
	pub detail: Option<String>,
	/// Time the event was produced.
	#[serde(with = "time::serde::rfc3339")]
	pub recorded_at: OffsetDateTime,
}
impl AuditEvent {
	/// Category stamped on events emitted by the gate.
	pub const GATE_CATEGORY: &'static str = "authority_gate";

	/// Creates an event stamped with the current time.
	pub fn new(kind: AuditKind, event: impl Into<String>, outcome: AuditOutcome) -> Self {
		Self {
			kind,
			category: Self::GATE_CATEGORY.into(),
			event: event.into(),
			outcome,
			identity: None,
			before: None,
			output: None,
			detail: None,
			recorded_at: OffsetDateTime::now_utc(),
		}
	}

	/// Names the username the operation concerned.
	pub fn with_identity(mut self, username: impl Into<String>) -> Self {
		self.identity = Some(username.into());

		self
	}

	/// Attaches the record state before the operation.
	pub fn with_before(mut self, before: Value) -> Self {
		self.before = Some(before);

		self
	}

	/// Attaches the operation output.
	pub fn with_output(mut self, output: Value) -> Self {
		self.output = Some(output);

		self
	}

	/// Attaches a free-form explanation.
	pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
		self.detail = Some(detail.into());

		self
	}

	/// Overrides the event timestamp.
	pub fn with_recorded_at(mut self, instant: OffsetDateTime) -> Self {
		self.recorded_at = instant;

		self
	}

	/// JSON view of an identity with its password digest stripped.
	pub fn identity_snapshot(identity: &Identity) -> Value {
		let mut value = serde_json::to_value(identity).unwrap_or(Value::Null);

		if let Some(object) = value.as_object_mut() {
			object.remove("password");
		}

		value
	}
}

/// Sink that keeps every event in memory, for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
	events: Mutex<Vec<AuditEvent>>,
}
impl MemoryAuditSink {
	/// Returns a copy of every recorded event, oldest first.
	pub fn events(&self) -> Vec<AuditEvent> {
		self.events.lock().clone()
	}

	/// Drops every recorded event.
	pub fn clear(&self) {
		self.events.lock().clear();
	}
}
impl AuditSink for MemoryAuditSink {
	fn record(&self, event: AuditEvent) -> AuditFuture<'_> {
		self.events.lock().push(event);

		Box::pin(async { Ok(()) })
	}
}

/// Sink that emits each event as a structured `tracing` event on the `authority_gate::audit`
/// target.
#[cfg(feature = "tracing")]
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingAuditSink;
#[cfg(feature = "tracing")]
impl AuditSink for TracingAuditSink {
	fn record(&self, event: AuditEvent) -> AuditFuture<'_> {
		tracing::info!(
			target: "authority_gate::audit",
			kind = event.kind.as_str(),
			category = %event.category,
			event = %event.event,
			outcome = event.outcome.as_str(),
			identity = event.identity.as_deref(),
			detail = event.detail.as_deref(),
			recorded_at = %event.recorded_at,
		);

		Box::pin(async { Ok(()) })
	}
}
