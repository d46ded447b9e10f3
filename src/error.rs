//! Gate-level error types shared across flows, stores, and connectors.

// self
use crate::{_prelude::*, auth::ResourceKey};

/// Gate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical gate error exposed by public APIs.
///
/// Only hard failures live here. Suspension, status refusals, and credential mismatches
/// are reported as [`DenialReason`](crate::flows::DenialReason) values instead.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Credential digest could not be produced or parsed.
	#[error(transparent)]
	Credential(#[from] CredentialError),

	/// The tenant key has no registered domain.
	#[error("Could not find domain {domain}.")]
	DomainNotFound {
		/// Requested domain key.
		domain: String,
	},
	/// Entitlements were requested for a username the domain does not know.
	#[error("Could not find any identity named {username}.")]
	UnknownIdentity {
		/// Requested username.
		username: String,
	},
}

/// Configuration and validation failures raised by the gate.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Configuration file could not be read.
	#[error("Failed to read configuration file {path}.")]
	Read {
		/// Path that failed to load.
		path: String,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Configuration payload is malformed.
	#[error("Configuration is malformed at {}.", .source.path())]
	Parse {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A configured identifier is blank.
	#[error("Configured {field} must not be blank.")]
	BlankIdentifier {
		/// Configuration field that was blank.
		field: &'static str,
	},
	/// Connector timeout must be strictly positive.
	#[error("Connector timeout must be positive.")]
	NonPositiveTimeout,
	/// Admin and anonymous identifiers must differ.
	#[error("Admin and anonymous identifiers must differ: {identifier}.")]
	ConflictingIdentifiers {
		/// Identifier configured for both roles.
		identifier: String,
	},
}

/// Failures raised while producing or parsing credential digests.
#[derive(Debug, ThisError)]
pub enum CredentialError {
	/// Stored digest is not valid base64.
	#[error("Stored digest is not valid base64.")]
	Encoding(#[from] base64::DecodeError),
	/// Stored salted digest is shorter than its salt.
	#[error("Stored salted digest is truncated.")]
	Truncated,
	/// Argon2 hashing or PHC parsing failed.
	#[error("Argon2 failure: {message}.")]
	Argon2 {
		/// Library-supplied message.
		message: String,
	},
}
impl From<argon2::password_hash::Error> for CredentialError {
	fn from(e: argon2::password_hash::Error) -> Self {
		Self::Argon2 { message: e.to_string() }
	}
}

/// Resource-local failures raised while authenticating against an external system.
///
/// These never escape the passthrough loop; they are logged and the resource is treated as
/// non-authenticating.
#[derive(Debug, ThisError)]
pub enum ConnectorError {
	/// The connector-object-key could not be derived from the identity.
	#[error("Could not derive the connector object key on {resource}: {reason}.")]
	Mapping {
		/// Resource whose provision failed.
		resource: ResourceKey,
		/// Why derivation failed.
		reason: String,
	},
	/// Network or protocol failure talking to the external system.
	#[error("Transport failure on {resource}.")]
	Transport {
		/// Resource that failed.
		resource: ResourceKey,
		/// Transport-specific error.
		#[source]
		source: BoxError,
	},
	/// The external system refused the request outright.
	#[error("{resource} rejected the request: {message}.")]
	Rejected {
		/// Resource that refused.
		resource: ResourceKey,
		/// Connector-supplied message.
		message: String,
	},
	/// The call exceeded the resource's timeout.
	#[error("{resource} did not answer within {after}.")]
	Timeout {
		/// Resource that stalled.
		resource: ResourceKey,
		/// Timeout that elapsed.
		after: Duration,
	},
}
impl ConnectorError {
	/// Wraps a transport-specific failure.
	pub fn transport(
		resource: ResourceKey,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Transport { resource, source: Box::new(src) }
	}

	/// Resource the failure belongs to.
	pub fn resource(&self) -> &ResourceKey {
		match self {
			Self::Mapping { resource, .. }
			| Self::Transport { resource, .. }
			| Self::Rejected { resource, .. }
			| Self::Timeout { resource, .. } => resource,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn connector_error_exposes_resource_and_source() {
		let resource = ResourceKey::new("ldap").expect("Resource fixture should be valid.");
		let err = ConnectorError::transport(resource.clone(), std::io::Error::other("reset"));

		assert_eq!(err.resource(), &resource);
		assert_eq!(err.to_string(), "Transport failure on ldap.");
		assert_eq!(
			StdError::source(&err).map(ToString::to_string).as_deref(),
			Some("reset")
		);
	}

	#[test]
	fn config_parse_error_reports_json_path() {
		let de = &mut serde_json::Deserializer::from_str(r#"{"nested":{"value":"x"}}"#);
		let source = serde_path_to_error::deserialize::<_, BTreeMap<String, BTreeMap<String, u8>>>(de)
			.expect_err("A string cannot deserialize into u8.");
		let err = ConfigError::Parse { source };

		assert!(err.to_string().contains("nested.value"));
	}
}
