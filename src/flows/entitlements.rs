//! Entitlement resolution for a username.
//!
//! Precedence: the anonymous identifier, the administrative identifier, then stored identities.
//! An identity that must change its password gets nothing but that entitlement; everyone
//! else gets role entitlements scoped to the role realms, plus owner entitlements on every
//! group they own.

// self
use crate::{
	_prelude::*,
	audit::{AuditEvent, AuditKind, AuditOutcome},
	auth::{
		AuthoritySet, RealmPath,
		entitlement::{ANONYMOUS, GROUP_OWNER, MUST_CHANGE_PASSWORD},
	},
	flows::{DomainContext, Gate, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Gate {
	/// Resolves the authorities granted to `username` in the resolved domain.
	pub async fn resolve_entitlements(
		&self,
		ctx: &DomainContext,
		username: &str,
	) -> Result<AuthoritySet> {
		const KIND: FlowKind = FlowKind::Entitlements;

		let span = FlowSpan::new(KIND, "resolve_entitlements");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.load_authorities(ctx, username)).await;
		let event = match &result {
			Ok(authorities) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);

				AuditEvent::new(AuditKind::Authorization, "resolve_entitlements", AuditOutcome::Success)
					.with_output(serde_json::to_value(authorities).unwrap_or_default())
			},
			Err(e) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);

				AuditEvent::new(AuditKind::Authorization, "resolve_entitlements", AuditOutcome::Failure)
					.with_detail(e.to_string())
			},
		};

		common::emit_audit(self, event.with_identity(username)).await;

		result
	}

	async fn load_authorities(&self, ctx: &DomainContext, username: &str) -> Result<AuthoritySet> {
		let mut authorities = AuthoritySet::new();

		if username == self.config.anonymous_identifier {
			authorities.grant_global(ANONYMOUS);

			return Ok(authorities);
		}
		if username == self.config.admin_identifier {
			for entitlement in self.catalog().iter() {
				authorities.grant(entitlement, [RealmPath::ROOT]);
			}

			return Ok(authorities);
		}

		let identity = self
			.collaborators
			.identities
			.find_by_name(ctx.key(), username)
			.await?
			.ok_or_else(|| Error::UnknownIdentity { username: username.to_owned() })?;

		if identity.must_change_password {
			authorities.grant_global(MUST_CHANGE_PASSWORD);

			return Ok(authorities);
		}

		for role in self.collaborators.identities.find_effective_roles(&identity).await? {
			for entitlement in &role.entitlements {
				authorities.grant(entitlement.as_str(), role.realms.iter().map(ToString::to_string));
			}
		}
		for group in self.collaborators.groups.find_owned_by(ctx.key(), &identity.key).await? {
			let realm = group.owner_realm();

			for entitlement in GROUP_OWNER {
				authorities.grant(entitlement, [realm.as_str()]);
			}
		}

		Ok(authorities)
	}
}
