//! Roles and groups, the two sources of aggregated entitlements.

// self
use crate::{
	_prelude::*,
	auth::{GroupKey, IdentityKey, RealmPath, RoleKey},
};

/// Set of entitlements applying over a set of realms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	/// Role key.
	pub key: RoleKey,
	/// Entitlement names granted by the role.
	#[serde(default)]
	pub entitlements: BTreeSet<String>,
	/// Realms the entitlements apply to; empty means global.
	#[serde(default)]
	pub realms: Vec<RealmPath>,
}
impl Role {
	/// Creates a role granting `entitlements` over `realms`.
	pub fn new<E, S>(key: RoleKey, entitlements: E, realms: Vec<RealmPath>) -> Self
	where
		E: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { key, entitlements: entitlements.into_iter().map(Into::into).collect(), realms }
	}
}

/// Group, optionally owned by an identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
	/// Group key.
	pub key: GroupKey,
	/// Realm the group lives in.
	pub realm: RealmPath,
	/// Identity owning the group.
	#[serde(default)]
	pub user_owner: Option<IdentityKey>,
}
impl Group {
	/// Pseudo-realm that scopes the owner's group entitlements.
	pub fn owner_realm(&self) -> String {
		self.realm.group_owner_realm(&self.key)
	}
}
