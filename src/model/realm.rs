//! Realms and the account policies that gate passthrough authentication.

// self
use crate::{
	_prelude::*,
	auth::{PolicyKey, RealmPath, ResourceKey},
};

/// Per-realm or per-resource policy naming the resources eligible for passthrough.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPolicy {
	/// Policy key.
	pub key: PolicyKey,
	/// Resources designated for passthrough authentication.
	#[serde(default)]
	pub passthrough_resources: BTreeSet<ResourceKey>,
}
impl AccountPolicy {
	/// Creates a policy naming the provided passthrough resources.
	pub fn new<I>(key: PolicyKey, resources: I) -> Self
	where
		I: IntoIterator<Item = ResourceKey>,
	{
		Self { key, passthrough_resources: resources.into_iter().collect() }
	}

	/// Passthrough resources this policy contributes, or `None` when it constrains nothing.
	pub fn passthrough_constraint(&self) -> Option<&BTreeSet<ResourceKey>> {
		(!self.passthrough_resources.is_empty()).then_some(&self.passthrough_resources)
	}
}

/// Node in the realm tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Realm {
	/// Full path of the realm.
	pub path: RealmPath,
	/// Optional account policy.
	#[serde(default)]
	pub account_policy: Option<AccountPolicy>,
}
impl Realm {
	/// Creates a realm without an account policy.
	pub fn new(path: RealmPath) -> Self {
		Self { path, account_policy: None }
	}

	/// Attaches an account policy.
	pub fn with_account_policy(mut self, policy: AccountPolicy) -> Self {
		self.account_policy = Some(policy);

		self
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn empty_policy_contributes_no_constraint() {
		let key = PolicyKey::new("account-1").expect("Policy key fixture should be valid.");
		let empty = AccountPolicy::new(key.clone(), []);
		let ldap = ResourceKey::new("resource-ldap").expect("Resource fixture should be valid.");
		let bound = AccountPolicy::new(key, [ldap.clone()]);

		assert!(empty.passthrough_constraint().is_none());
		assert_eq!(bound.passthrough_constraint().map(|set| set.contains(&ldap)), Some(true));
	}
}
