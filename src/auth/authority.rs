//! Granted authorities keyed by entitlement name with merged realm scopes.

// std
use std::collections::btree_map::Entry;
// self
use crate::_prelude::*;

/// An entitlement together with the realms it applies to.
///
/// An empty realm set means the authority is global.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedAuthority {
	/// Entitlement name.
	pub entitlement: String,
	/// Realm scopes (full paths or group-owner pseudo-realms).
	pub realms: BTreeSet<String>,
}
impl GrantedAuthority {
	/// Returns true when the authority is not restricted to any realm.
	pub fn is_global(&self) -> bool {
		self.realms.is_empty()
	}
}

/// Authority set keyed by entitlement name.
///
/// Granting an entitlement that is already present unions its realm scopes instead of adding
/// a second entry, so identity is by name only. A global grant absorbs every scoped grant of
/// the same entitlement, in either order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthoritySet(BTreeMap<String, BTreeSet<String>>);
impl AuthoritySet {
	/// Creates an empty authority set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Grants `entitlement` over `realms`, merging with any existing grant.
	///
	/// An empty `realms` grants globally.
	pub fn grant<I, S>(&mut self, entitlement: impl Into<String>, realms: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let realms = realms.into_iter().map(Into::into).collect::<BTreeSet<String>>();

		match self.0.entry(entitlement.into()) {
			Entry::Vacant(entry) => {
				entry.insert(realms);
			},
			Entry::Occupied(mut entry) => {
				let scopes = entry.get_mut();

				if realms.is_empty() {
					scopes.clear();
				} else if !scopes.is_empty() {
					scopes.extend(realms);
				}
			},
		}
	}

	/// Grants `entitlement` with global scope.
	pub fn grant_global(&mut self, entitlement: impl Into<String>) {
		self.grant(entitlement, std::iter::empty::<String>());
	}

	/// Number of distinct entitlements.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no entitlement has been granted.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if `entitlement` has been granted in any scope.
	pub fn contains(&self, entitlement: &str) -> bool {
		self.0.contains_key(entitlement)
	}

	/// Realm scopes granted for `entitlement`, if present.
	pub fn realms(&self, entitlement: &str) -> Option<&BTreeSet<String>> {
		self.0.get(entitlement)
	}

	/// Iterator over `(entitlement, realms)` pairs, ascending by entitlement.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
		self.0.iter().map(|(name, realms)| (name.as_str(), realms))
	}

	/// Entitlement names, ascending.
	pub fn entitlements(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	/// Materializes owned [`GrantedAuthority`] values.
	pub fn to_authorities(&self) -> Vec<GrantedAuthority> {
		self.0
			.iter()
			.map(|(entitlement, realms)| GrantedAuthority {
				entitlement: entitlement.clone(),
				realms: realms.clone(),
			})
			.collect()
	}

	/// Consumes the set into owned [`GrantedAuthority`] values.
	pub fn into_authorities(self) -> Vec<GrantedAuthority> {
		self.0
			.into_iter()
			.map(|(entitlement, realms)| GrantedAuthority { entitlement, realms })
			.collect()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn grants_merge_realms_by_entitlement_name() {
		let mut set = AuthoritySet::new();

		set.grant("FOO", ["/a"]);
		set.grant("FOO", ["/b", "/a"]);
		set.grant("BAR", ["/c"]);

		assert_eq!(set.len(), 2);
		assert_eq!(
			set.realms("FOO").map(|realms| realms.iter().map(String::as_str).collect::<Vec<_>>()),
			Some(vec!["/a", "/b"])
		);
	}

	#[test]
	fn global_grants_keep_an_empty_scope() {
		let mut set = AuthoritySet::new();

		set.grant_global("ANONYMOUS");

		let authorities = set.to_authorities();

		assert_eq!(authorities.len(), 1);
		assert!(authorities[0].is_global());
	}

	#[test]
	fn global_grants_are_not_narrowed_by_scoped_ones() {
		let mut scoped_first = AuthoritySet::new();

		scoped_first.grant("FOO", ["/a"]);
		scoped_first.grant_global("FOO");
		scoped_first.grant("FOO", ["/b"]);

		let mut global_first = AuthoritySet::new();

		global_first.grant_global("FOO");
		global_first.grant("FOO", ["/a"]);

		for set in [scoped_first, global_first] {
			assert_eq!(set.len(), 1);
			assert!(set.to_authorities()[0].is_global());
		}
	}

	#[test]
	fn serializes_as_entitlement_map() {
		let mut set = AuthoritySet::new();

		set.grant("USER_READ", ["/"]);

		let payload = serde_json::to_string(&set).expect("Authority set should serialize.");

		assert_eq!(payload, r#"{"USER_READ":["/"]}"#);
	}
}
