//! Credential authentication with passthrough fallback and login bookkeeping.
//!
//! [`Gate::authenticate`] looks the username up in the resolved domain, refuses suspended
//! identities and statuses outside the domain's allow-list, then verifies the credential
//! against the stored digest. When that fails, every eligible passthrough resource is tried in
//! order until one accepts; connector errors and timeouts only skip the resource. The outcome
//! updates the failed-login counter (and optionally the last-login date) with a single store
//! write, and is audited before returning.

mod metrics;

pub use metrics::AuthenticationMetrics;

// self
use crate::{
	_prelude::*,
	audit::{AuditEvent, AuditKind, AuditOutcome},
	auth::{Credential, IdentityKey},
	connector::PassthroughOutcome,
	error::ConnectorError,
	flows::{DomainContext, Gate, common},
	model::{ExternalResource, Identity},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Why an existing identity was refused.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenialReason {
	/// The identity is suspended; the credential was not checked.
	Suspended,
	/// The identity's status is outside the domain allow-list; the credential was not checked.
	StatusNotAllowed {
		/// Status the identity carried.
		status: Option<String>,
	},
	/// Neither the stored digest nor any passthrough resource accepted the credential.
	InvalidCredential,
}
impl Display for DenialReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Suspended => f.write_str("identity is suspended"),
			Self::StatusNotAllowed { status: Some(status) } =>
				write!(f, "status {status} is not allowed to authenticate"),
			Self::StatusNotAllowed { status: None } =>
				f.write_str("identity without status is not allowed to authenticate"),
			Self::InvalidCredential => f.write_str("credential was not accepted"),
		}
	}
}
impl From<&DenialReason> for AuditOutcome {
	fn from(reason: &DenialReason) -> Self {
		match reason {
			DenialReason::Suspended => AuditOutcome::Suspended,
			DenialReason::StatusNotAllowed { .. } => AuditOutcome::Disallowed,
			DenialReason::InvalidCredential => AuditOutcome::Failure,
		}
	}
}

/// Result of an authentication attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginAttempt {
	/// The credential was accepted.
	Authenticated(IdentityKey),
	/// The identity exists but was refused.
	Denied {
		/// Key of the refused identity.
		identity: IdentityKey,
		/// Refusal reason.
		reason: DenialReason,
	},
	/// No identity with the requested username exists in the domain.
	IdentityUnknown,
}
impl LoginAttempt {
	/// Whether the attempt authenticated.
	pub fn is_authenticated(&self) -> bool {
		matches!(self, Self::Authenticated(_))
	}

	/// Key of the identity the attempt concerned, when it exists.
	pub fn identity(&self) -> Option<&IdentityKey> {
		match self {
			Self::Authenticated(identity) | Self::Denied { identity, .. } => Some(identity),
			Self::IdentityUnknown => None,
		}
	}

	/// Projects onto the `(identity key, authenticated)` pair.
	pub fn as_pair(&self) -> (Option<IdentityKey>, bool) {
		(self.identity().cloned(), self.is_authenticated())
	}
}

impl Gate {
	/// Authenticates `username` in the resolved domain.
	///
	/// Refusals are values; only store failures surface as errors. Dropping the returned future
	/// before it completes persists nothing.
	pub async fn authenticate(
		&self,
		ctx: &DomainContext,
		username: &str,
		credential: &Credential,
	) -> Result<LoginAttempt> {
		const KIND: FlowKind = FlowKind::Authenticate;

		let span = FlowSpan::new(KIND, "authenticate");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				self.metrics.record_attempt();

				let guard = self
					.config
					.serialize_attempts
					.then(|| common::attempt_guard(self, ctx.key(), username));
				let _serialized = match &guard {
					Some(guard) => Some(guard.lock().await),
					None => None,
				};

				self.attempt(ctx, username, credential).await.inspect_err(|_| {
					self.metrics.record_failure();
				})
			})
			.await;

		match &result {
			Ok(attempt) if attempt.is_authenticated() => {
				self.metrics.record_success();
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
			},
			Ok(_) => {
				self.metrics.record_denial();
				obs::record_flow_outcome(KIND, FlowOutcome::Denied);
			},
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Checks `credential` against the stored digest, then against the passthrough resources.
	pub async fn verify(
		&self,
		ctx: &DomainContext,
		identity: &Identity,
		credential: &Credential,
	) -> Result<bool> {
		if Self::verify_internal(identity, credential) {
			return Ok(true);
		}

		Ok(self.authenticate_passthrough(ctx, identity, credential).await?.is_authenticated())
	}

	/// Tries every eligible passthrough resource in order until one accepts `credential`.
	pub async fn authenticate_passthrough(
		&self,
		ctx: &DomainContext,
		identity: &Identity,
		credential: &Credential,
	) -> Result<PassthroughOutcome> {
		let resources = self.select_passthrough_resources(ctx, identity).await?;
		let mut attempted = 0;

		for resource in &resources {
			attempted += 1;

			match self.authenticate_on(resource, identity, credential).await {
				Ok(Some(account)) => {
					obs::log_passthrough_result(&resource.key, true);

					return Ok(PassthroughOutcome::Authenticated {
						resource: resource.key.clone(),
						account,
					});
				},
				Ok(None) => obs::log_passthrough_result(&resource.key, false),
				Err(e) => obs::log_passthrough_error(&e),
			}
		}

		Ok(PassthroughOutcome::Exhausted { attempted })
	}

	async fn attempt(
		&self,
		ctx: &DomainContext,
		username: &str,
		credential: &Credential,
	) -> Result<LoginAttempt> {
		let Some(mut identity) =
			self.collaborators.identities.find_by_name(ctx.key(), username).await?
		else {
			self.audit_attempt(username, AuditOutcome::Failure, |event| {
				event.with_detail("identity not found")
			})
			.await;

			return Ok(LoginAttempt::IdentityUnknown);
		};
		let refusal = if identity.suspended {
			Some(DenialReason::Suspended)
		} else if !ctx.settings.allows_status(identity.status.as_deref()) {
			Some(DenialReason::StatusNotAllowed { status: identity.status.clone() })
		} else {
			None
		};

		if let Some(reason) = refusal {
			self.audit_attempt(username, AuditOutcome::from(&reason), |event| {
				event.with_detail(reason.to_string())
			})
			.await;

			return Ok(LoginAttempt::Denied { identity: identity.key, reason });
		}

		let before = AuditEvent::identity_snapshot(&identity);
		let authenticated = self.verify(ctx, &identity, credential).await?;
		let modified = if authenticated {
			identity.record_success(ctx.settings.log_last_login, OffsetDateTime::now_utc())
		} else {
			identity.record_failure()
		};

		if modified {
			self.collaborators.identities.save(identity.clone()).await?;
		}

		let attempt = if authenticated {
			LoginAttempt::Authenticated(identity.key.clone())
		} else {
			LoginAttempt::Denied {
				identity: identity.key.clone(),
				reason: DenialReason::InvalidCredential,
			}
		};
		let output = AuditEvent::identity_snapshot(&identity);

		self.audit_attempt(username, AuditOutcome::from_success(authenticated), |event| {
			let event = event.with_before(before).with_output(output);

			match &attempt {
				LoginAttempt::Denied { reason, .. } => event.with_detail(reason.to_string()),
				_ => event,
			}
		})
		.await;

		Ok(attempt)
	}

	fn verify_internal(identity: &Identity, credential: &Credential) -> bool {
		let matched = match (identity.cipher_algorithm, identity.password.as_deref()) {
			(Some(algorithm), Some(stored)) =>
				credential.verify(algorithm, stored).unwrap_or_else(|e| {
					obs::log_malformed_digest(&identity.username, &e);

					false
				}),
			_ => false,
		};

		obs::log_internal_verification(&identity.username, matched);

		matched
	}

	async fn authenticate_on(
		&self,
		resource: &ExternalResource,
		identity: &Identity,
		credential: &Credential,
	) -> Result<Option<String>, ConnectorError> {
		let object_key = resource.conn_object_key(identity)?;
		let timeout =
			resource.connector_timeout().unwrap_or_else(|| self.config.default_connector_timeout());
		let call =
			self.collaborators.connectors.authenticate(resource, &object_key, credential, timeout);

		match tokio::time::timeout(timeout.unsigned_abs(), call).await {
			Ok(result) => result,
			Err(_) => Err(ConnectorError::Timeout { resource: resource.key.clone(), after: timeout }),
		}
	}

	async fn audit_attempt<F>(&self, username: &str, outcome: AuditOutcome, decorate: F)
	where
		F: FnOnce(AuditEvent) -> AuditEvent,
	{
		let event =
			AuditEvent::new(AuditKind::Authentication, "authenticate", outcome).with_identity(username);

		common::emit_audit(self, decorate(event)).await;
	}
}
