//! External resource bindings and their user provisioning mappings.

// self
use crate::{
	_prelude::*,
	auth::ResourceKey,
	error::ConnectorError,
	model::{AccountPolicy, Identity},
};

/// Identity field mapped onto the connector-object-key of an external system.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ConnObjectKeyItem {
	/// The identity's username.
	Username,
	/// The identity's stable key.
	Key,
	/// First value of a plain attribute.
	Attribute {
		/// Attribute name.
		name: String,
	},
}

/// User provisioning settings of an external resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
	/// Mapping item that yields the connector-object-key.
	pub object_key: ConnObjectKeyItem,
}

/// External identity-system binding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalResource {
	/// Resource key.
	pub key: ResourceKey,
	/// Optional account policy; its passthrough list narrows the eligible resources.
	#[serde(default)]
	pub account_policy: Option<AccountPolicy>,
	/// User provisioning; required to derive the connector-object-key.
	#[serde(default)]
	pub provision: Option<Provision>,
	/// Per-resource connector timeout in milliseconds; zero falls back to the gate default.
	#[serde(default)]
	pub connector_timeout_ms: Option<u64>,
}
impl ExternalResource {
	/// Creates a resource with no policy, provision, or timeout override.
	pub fn new(key: ResourceKey) -> Self {
		Self { key, account_policy: None, provision: None, connector_timeout_ms: None }
	}

	/// Attaches an account policy.
	pub fn with_account_policy(mut self, policy: AccountPolicy) -> Self {
		self.account_policy = Some(policy);

		self
	}

	/// Sets the user provisioning mapping item.
	pub fn with_object_key(mut self, item: ConnObjectKeyItem) -> Self {
		self.provision = Some(Provision { object_key: item });

		self
	}

	/// Overrides the connector timeout.
	///
	/// A zero or negative timeout clears the override.
	pub fn with_connector_timeout(mut self, timeout: Duration) -> Self {
		self.connector_timeout_ms =
			u64::try_from(timeout.whole_milliseconds()).ok().filter(|ms| *ms > 0);

		self
	}

	/// Connector timeout configured on this resource, if any.
	///
	/// A stored zero counts as no override.
	pub fn connector_timeout(&self) -> Option<Duration> {
		self.connector_timeout_ms
			.filter(|ms| *ms > 0)
			.map(|ms| Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX)))
	}

	/// Derives the identity's connector-object-key through the user provision.
	pub fn conn_object_key(&self, identity: &Identity) -> Result<String, ConnectorError> {
		let provision = self.provision.as_ref().ok_or_else(|| ConnectorError::Mapping {
			resource: self.key.clone(),
			reason: "no user provision is configured".into(),
		})?;
		let value = match &provision.object_key {
			ConnObjectKeyItem::Username => Some(identity.username.clone()),
			ConnObjectKeyItem::Key => Some(identity.key.to_string()),
			ConnObjectKeyItem::Attribute { name } => identity.attribute(name).map(str::to_owned),
		};

		value.filter(|value| !value.is_empty()).ok_or_else(|| ConnectorError::Mapping {
			resource: self.key.clone(),
			reason: format!("{} has no value for the object key mapping", identity.username),
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{DomainKey, IdentityKey, RealmPath};

	fn identity() -> Identity {
		let mut identity = Identity::new(
			IdentityKey::new("c9b2dec2").expect("Identity key fixture should be valid."),
			DomainKey::master(),
			"verdi",
			RealmPath::root(),
		);

		identity.attributes.insert("email".into(), vec!["verdi@example.org".into()]);

		identity
	}

	fn resource() -> ExternalResource {
		ExternalResource::new(ResourceKey::new("resource-ldap").expect("Resource fixture should be valid."))
	}

	#[test]
	fn object_key_follows_mapping_item() {
		let identity = identity();

		assert_eq!(
			resource()
				.with_object_key(ConnObjectKeyItem::Username)
				.conn_object_key(&identity)
				.expect("Username mapping should resolve."),
			"verdi"
		);
		assert_eq!(
			resource()
				.with_object_key(ConnObjectKeyItem::Attribute { name: "email".into() })
				.conn_object_key(&identity)
				.expect("Attribute mapping should resolve."),
			"verdi@example.org"
		);
	}

	#[test]
	fn missing_provision_or_value_is_a_mapping_error() {
		let identity = identity();

		assert!(matches!(
			resource().conn_object_key(&identity),
			Err(ConnectorError::Mapping { .. })
		));
		assert!(matches!(
			resource()
				.with_object_key(ConnObjectKeyItem::Attribute { name: "uid".into() })
				.conn_object_key(&identity),
			Err(ConnectorError::Mapping { .. })
		));
	}

	#[test]
	fn timeout_round_trips_through_milliseconds() {
		let resource = resource().with_connector_timeout(Duration::seconds(5));

		assert_eq!(resource.connector_timeout_ms, Some(5_000));
		assert_eq!(resource.connector_timeout(), Some(Duration::seconds(5)));
	}

	#[test]
	fn non_positive_timeouts_fall_back_to_the_default() {
		assert_eq!(resource().with_connector_timeout(Duration::seconds(-3)).connector_timeout_ms, None);
		assert_eq!(resource().with_connector_timeout(Duration::ZERO).connector_timeout(), None);

		let loaded = serde_json::from_str::<ExternalResource>(
			r#"{"key":"resource-ldap","connector_timeout_ms":0}"#,
		)
		.expect("Resource with a zero timeout should deserialize.");

		assert_eq!(loaded.connector_timeout(), None);
	}
}
