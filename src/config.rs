//! Static gate configuration and the per-domain configuration keys the gate reads.

// std
use std::{fs, path::Path};
// self
use crate::{_prelude::*, auth::EntitlementCatalog, error::ConfigError};

/// Domain configuration key listing the statuses allowed to authenticate (multi-valued).
pub const AUTHENTICATION_STATUSES: &str = "authentication.statuses";
/// Domain configuration key toggling last-login-date recording (boolean).
pub const LOG_LAST_LOGIN_DATE: &str = "log.lastlogindate";

/// Process-wide settings fixed when the [`Gate`](crate::flows::Gate) is built.
///
/// Unknown fields are rejected when loading from JSON; omitted fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GateConfig {
	/// Username that receives every known entitlement scoped to the root realm.
	pub admin_identifier: String,
	/// Username that receives only the anonymous entitlement.
	pub anonymous_identifier: String,
	/// Connector timeout applied to resources that do not override it, in milliseconds.
	pub connector_timeout_ms: u64,
	/// Serializes concurrent attempts for the same username within this process.
	///
	/// Off by default: concurrent failed attempts may then lose a failed-login increment.
	pub serialize_attempts: bool,
	/// Entitlements registered on top of the built-in list.
	pub extra_entitlements: BTreeSet<String>,
}
impl GateConfig {
	/// Connector timeout used when the configuration omits it.
	pub const DEFAULT_CONNECTOR_TIMEOUT_MS: u64 = 30_000;

	/// Parses and validates a JSON configuration document.
	pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(json);
		let config: Self = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })?;

		config.validate()?;

		Ok(config)
	}

	/// Reads, parses, and validates a JSON configuration file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let json = fs::read_to_string(path)
			.map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;

		Self::from_json_str(&json)
	}

	/// Checks the invariants every gate relies on.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.admin_identifier.trim().is_empty() {
			return Err(ConfigError::BlankIdentifier { field: "admin_identifier" });
		}
		if self.anonymous_identifier.trim().is_empty() {
			return Err(ConfigError::BlankIdentifier { field: "anonymous_identifier" });
		}
		if self.admin_identifier == self.anonymous_identifier {
			return Err(ConfigError::ConflictingIdentifiers {
				identifier: self.admin_identifier.clone(),
			});
		}
		if self.connector_timeout_ms == 0 {
			return Err(ConfigError::NonPositiveTimeout);
		}

		Ok(())
	}

	/// Sets the administrative username.
	pub fn with_admin_identifier(mut self, identifier: impl Into<String>) -> Self {
		self.admin_identifier = identifier.into();

		self
	}

	/// Sets the anonymous username.
	pub fn with_anonymous_identifier(mut self, identifier: impl Into<String>) -> Self {
		self.anonymous_identifier = identifier.into();

		self
	}

	/// Sets the default connector timeout.
	pub fn with_connector_timeout(mut self, timeout: Duration) -> Self {
		self.connector_timeout_ms = u64::try_from(timeout.whole_milliseconds()).unwrap_or(0);

		self
	}

	/// Enables or disables per-username attempt serialization.
	pub fn with_serialize_attempts(mut self, enabled: bool) -> Self {
		self.serialize_attempts = enabled;

		self
	}

	/// Registers additional entitlement names.
	pub fn with_extra_entitlements<I, S>(mut self, entitlements: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.extra_entitlements.extend(entitlements.into_iter().map(Into::into));

		self
	}

	/// Connector timeout applied to resources that do not override it.
	pub fn default_connector_timeout(&self) -> Duration {
		Duration::milliseconds(i64::try_from(self.connector_timeout_ms).unwrap_or(i64::MAX))
	}

	/// Built-in entitlements plus [`Self::extra_entitlements`].
	pub fn catalog(&self) -> EntitlementCatalog {
		EntitlementCatalog::with_extra(self.extra_entitlements.iter().cloned())
	}
}
impl Default for GateConfig {
	fn default() -> Self {
		Self {
			admin_identifier: "admin".into(),
			anonymous_identifier: "anonymous".into(),
			connector_timeout_ms: Self::DEFAULT_CONNECTOR_TIMEOUT_MS,
			serialize_attempts: false,
			extra_entitlements: BTreeSet::new(),
		}
	}
}
