//! Multi-tenant authentication and entitlement resolution: internal credential checks,
//! policy-gated passthrough to external identity systems, lockout bookkeeping, and
//! realm-scoped authorities in one crate.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod audit;
pub mod auth;
pub mod config;
pub mod connector;
pub mod error;
pub mod flows;
pub mod model;
pub mod obs;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and fixtures for integration tests; enabled via `cfg(test)` or
	//! the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		audit::{AuditSink, MemoryAuditSink},
		auth::{CipherAlgorithm, Credential, DomainKey, IdentityKey, RealmPath},
		config::GateConfig,
		connector::{ConnectorFuture, ConnectorGateway},
		error::ConnectorError,
		flows::{Collaborators, Gate},
		model::{Domain, ExternalResource, Identity},
		store::MemoryStore,
	};

	/// Scripted reply returned by [`ScriptedGateway`] for a resource.
	#[derive(Clone, Debug)]
	pub enum ScriptedReply {
		/// Accept the credential when it equals the provided secret.
		AcceptSecret(String),
		/// Reject every credential.
		Reject,
		/// Fail with a transport error.
		Fail,
		/// Sleep for the provided duration before rejecting.
		Stall(Duration),
	}

	/// In-process [`ConnectorGateway`] whose replies are configured per resource key.
	#[derive(Debug, Default)]
	pub struct ScriptedGateway {
		replies: RwLock<HashMap<String, ScriptedReply>>,
		calls: Mutex<Vec<(String, String)>>,
	}
	impl ScriptedGateway {
		/// Configures the reply for a resource key.
		pub fn reply(&self, resource: &str, reply: ScriptedReply) {
			self.replies.write().insert(resource.to_owned(), reply);
		}

		/// Returns every `(resource, object_key)` pair the gateway was asked to authenticate.
		pub fn calls(&self) -> Vec<(String, String)> {
			self.calls.lock().clone()
		}
	}
	impl ConnectorGateway for ScriptedGateway {
		fn authenticate<'a>(
			&'a self,
			resource: &'a ExternalResource,
			object_key: &'a str,
			credential: &'a Credential,
			_timeout: Duration,
		) -> ConnectorFuture<'a, Option<String>> {
			self.calls.lock().push((resource.key.to_string(), object_key.to_owned()));

			let reply = self.replies.read().get(resource.key.as_ref()).cloned();

			Box::pin(async move {
				match reply.unwrap_or(ScriptedReply::Reject) {
					ScriptedReply::AcceptSecret(secret) if secret == credential.expose() =>
						Ok(Some(format!("{object_key}@{}", resource.key))),
					ScriptedReply::AcceptSecret(_) | ScriptedReply::Reject => Ok(None),
					ScriptedReply::Fail => Err(ConnectorError::transport(
						resource.key.clone(),
						std::io::Error::other("connection refused"),
					)),
					ScriptedReply::Stall(delay) => {
						tokio::time::sleep(delay.unsigned_abs()).await;

						Ok(None)
					},
				}
			})
		}
	}

	/// Handles returned by [`build_test_gate`].
	pub struct TestGate {
		/// Gate wired to the fixtures below.
		pub gate: Gate,
		/// Directory backing every store contract.
		pub store: Arc<MemoryStore>,
		/// Audit sink capturing emitted events.
		pub audit: Arc<MemoryAuditSink>,
		/// Scripted connector gateway.
		pub gateway: Arc<ScriptedGateway>,
		/// Domain registered in the store.
		pub domain: DomainKey,
	}

	/// Builds a [`Gate`] over an in-memory directory holding a single `Master` domain.
	pub fn build_test_gate(config: GateConfig) -> TestGate {
		let store = Arc::new(MemoryStore::default());
		let audit = Arc::new(MemoryAuditSink::default());
		let gateway = Arc::new(ScriptedGateway::default());
		let domain = DomainKey::master();

		store.insert_domain(Domain::new(domain.clone()));

		let audit_sink: Arc<dyn AuditSink> = audit.clone();
		let collaborators = Collaborators::from_directory(store.clone(), gateway.clone(), audit_sink);
		let gate = Gate::new(collaborators, config);

		TestGate { gate, store, audit, gateway, domain }
	}

	/// Builds an active identity with a SHA-256 password digest.
	pub fn identity_fixture(domain: &DomainKey, key: &str, username: &str, password: &str) -> Identity {
		let digest = Credential::new(password)
			.digest(CipherAlgorithm::Sha256)
			.expect("Digesting a fixture password should succeed.");
		let mut identity = Identity::new(
			IdentityKey::new(key).expect("Identity key fixture should be valid."),
			domain.clone(),
			username,
			RealmPath::root(),
		);

		identity.password = Some(digest);
		identity.cipher_algorithm = Some(CipherAlgorithm::Sha256);
		identity.status = Some("active".into());

		identity
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, BTreeSet, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::Hash,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use color_eyre as _;
