//! Connector contract used for passthrough authentication against external identity systems.
//!
//! The wire protocol spoken to each system stays behind [`ConnectorGateway`]; the gate only
//! hands over the resource binding, the derived connector-object-key, the presented
//! credential, and the timeout it will enforce.

// self
use crate::{
	_prelude::*,
	auth::{Credential, ResourceKey},
	error::ConnectorError,
	model::ExternalResource,
};

/// Boxed future returned by [`ConnectorGateway::authenticate`].
pub type ConnectorFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, ConnectorError>> + 'a + Send>>;

/// Gateway that authenticates a connector object on an external resource.
pub trait ConnectorGateway
where
	Self: Send + Sync,
{
	/// Authenticates `object_key` with `credential` on `resource`.
	///
	/// Resolves to the external account identifier on success and `None` when the external
	/// system rejects the credential. `timeout` is advisory: the gate enforces it regardless.
	fn authenticate<'a>(
		&'a self,
		resource: &'a ExternalResource,
		object_key: &'a str,
		credential: &'a Credential,
		timeout: Duration,
	) -> ConnectorFuture<'a, Option<String>>;
}

/// Result of walking the selected passthrough resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PassthroughOutcome {
	/// A resource accepted the credential; later resources were not consulted.
	Authenticated {
		/// Resource that accepted the credential.
		resource: ResourceKey,
		/// External account identifier reported by the connector.
		account: String,
	},
	/// Every selected resource rejected, failed, or timed out.
	Exhausted {
		/// Number of resources consulted.
		attempted: usize,
	},
}
impl PassthroughOutcome {
	/// Whether any resource accepted the credential.
	pub fn is_authenticated(&self) -> bool {
		matches!(self, Self::Authenticated { .. })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn only_authenticated_outcome_reports_success() {
		let resource = ResourceKey::new("resource-ldap").expect("Resource fixture should be valid.");

		assert!(
			PassthroughOutcome::Authenticated { resource, account: "uid=verdi".into() }
				.is_authenticated()
		);
		assert!(!PassthroughOutcome::Exhausted { attempted: 2 }.is_authenticated());
	}
}
