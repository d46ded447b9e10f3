//! Well-known entitlement names and the catalog granted to the administrative identity.

// self
use crate::_prelude::*;

macro_rules! def_entitlements {
	($($name:ident),+ $(,)?) => {
		$(
			#[doc = concat!("The `", stringify!($name), "` entitlement.")]
			pub const $name: &str = stringify!($name);
		)+

		/// Every entitlement built into the platform, in declaration order.
		pub const BUILT_IN: &[&str] = &[$($name),+];
	};
}

def_entitlements! {
	ANONYMOUS,
	MUST_CHANGE_PASSWORD,
	DOMAIN_CREATE,
	DOMAIN_READ,
	DOMAIN_UPDATE,
	DOMAIN_DELETE,
	REALM_LIST,
	REALM_CREATE,
	REALM_UPDATE,
	REALM_DELETE,
	ROLE_LIST,
	ROLE_CREATE,
	ROLE_READ,
	ROLE_UPDATE,
	ROLE_DELETE,
	SCHEMA_LIST,
	SCHEMA_CREATE,
	SCHEMA_READ,
	SCHEMA_UPDATE,
	SCHEMA_DELETE,
	USER_SEARCH,
	USER_CREATE,
	USER_READ,
	USER_UPDATE,
	USER_DELETE,
	GROUP_SEARCH,
	GROUP_CREATE,
	GROUP_READ,
	GROUP_UPDATE,
	GROUP_DELETE,
	RESOURCE_LIST,
	RESOURCE_CREATE,
	RESOURCE_READ,
	RESOURCE_UPDATE,
	RESOURCE_DELETE,
	CONNECTOR_LIST,
	CONNECTOR_CREATE,
	CONNECTOR_READ,
	CONNECTOR_UPDATE,
	CONNECTOR_DELETE,
	POLICY_LIST,
	POLICY_CREATE,
	POLICY_READ,
	POLICY_UPDATE,
	POLICY_DELETE,
	CONFIGURATION_LIST,
	CONFIGURATION_SET,
	CONFIGURATION_DELETE,
	AUDIT_LIST,
	AUDIT_ENABLE,
	AUDIT_DISABLE,
	TASK_LIST,
	TASK_EXECUTE,
	REPORT_LIST,
	REPORT_EXECUTE,
}

/// Entitlements granted on every group an identity owns.
pub const GROUP_OWNER: [&str; 3] = [GROUP_READ, GROUP_UPDATE, GROUP_DELETE];

/// Set of every entitlement known to the system.
///
/// Built-in names are always present; deployments may register extension entitlements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntitlementCatalog(BTreeSet<String>);
impl EntitlementCatalog {
	/// Creates a catalog holding the built-in entitlements plus `extra`.
	pub fn with_extra<I, S>(extra: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let mut names = BUILT_IN.iter().map(|name| (*name).to_owned()).collect::<BTreeSet<_>>();

		names.extend(extra.into_iter().map(Into::into));

		Self(names)
	}

	/// Number of known entitlements.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the catalog is empty (never the case for built catalogs).
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if `name` is a known entitlement.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains(name)
	}

	/// Iterator over known entitlement names, ascending.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}
impl Default for EntitlementCatalog {
	fn default() -> Self {
		Self::with_extra(std::iter::empty::<String>())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn built_in_names_match_constants() {
		assert_eq!(ANONYMOUS, "ANONYMOUS");
		assert_eq!(GROUP_OWNER, ["GROUP_READ", "GROUP_UPDATE", "GROUP_DELETE"]);
		assert_eq!(EntitlementCatalog::default().len(), BUILT_IN.len());
	}

	#[test]
	fn extension_entitlements_extend_without_duplicates() {
		let catalog = EntitlementCatalog::with_extra(["CAMEL_ROUTE_LIST", "USER_READ"]);

		assert_eq!(catalog.len(), BUILT_IN.len() + 1);
		assert!(catalog.contains("CAMEL_ROUTE_LIST"));
		assert!(catalog.contains(MUST_CHANGE_PASSWORD));
	}
}
