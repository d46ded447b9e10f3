//! Passthrough resource selection driven by account policies.
//!
//! Assigned resources are visited first, then the identity's realm chain from the root
//! down. Every node carrying a non-empty account policy narrows the candidate set to the
//! intersection of what it names; nodes without one are transparent. When no node carries a
//! policy, nothing is eligible.

// self
use crate::{
	_prelude::*,
	auth::ResourceKey,
	flows::{DomainContext, Gate},
	model::{AccountPolicy, ExternalResource, Identity},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Accumulator for the passthrough candidate set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyIntersection(Option<BTreeSet<ResourceKey>>);
impl PolicyIntersection {
	/// Creates an accumulator that has not seen any policy yet.
	pub fn new() -> Self {
		Self::default()
	}

	/// Folds a node's policy into the accumulator.
	///
	/// Absent or empty policies leave the accumulator untouched.
	pub fn contribute(&mut self, policy: Option<&AccountPolicy>) {
		let Some(named) = policy.and_then(AccountPolicy::passthrough_constraint) else {
			return;
		};

		match &mut self.0 {
			None => self.0 = Some(named.clone()),
			Some(current) => current.retain(|key| named.contains(key)),
		}
	}

	/// Whether no policy-bearing node has been folded in yet.
	pub fn is_unconstrained(&self) -> bool {
		self.0.is_none()
	}

	/// Final selection; empty when no policy-bearing node was seen.
	pub fn into_selection(self) -> BTreeSet<ResourceKey> {
		self.0.unwrap_or_default()
	}
}

impl Gate {
	/// Resources eligible for passthrough authentication of `identity`, in ascending key order.
	///
	/// Keys the policies name but the store cannot resolve are skipped.
	pub async fn select_passthrough_resources(
		&self,
		ctx: &DomainContext,
		identity: &Identity,
	) -> Result<Vec<ExternalResource>> {
		const KIND: FlowKind = FlowKind::Passthrough;

		let span = FlowSpan::new(KIND, "select_passthrough_resources");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let collaborators = &self.collaborators;
				let mut intersection = PolicyIntersection::new();

				for resource in collaborators.identities.find_assigned_resources(identity).await? {
					intersection.contribute(resource.account_policy.as_ref());
				}
				for realm in collaborators.realms.find_ancestors(ctx.key(), &identity.realm).await? {
					intersection.contribute(realm.account_policy.as_ref());
				}

				let mut selected = Vec::new();

				for key in intersection.into_selection() {
					match collaborators.resources.find_resource(ctx.key(), &key).await? {
						Some(resource) => selected.push(resource),
						None => obs::log_unresolved_resource(ctx.key(), &key),
					}
				}

				Ok(selected)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}
