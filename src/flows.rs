//! Gate facade plus the domain, passthrough, authentication, and entitlement flows.

pub mod authenticate;
pub mod domain;
pub mod entitlements;
pub mod passthrough;

mod common;

pub use authenticate::*;
pub use domain::*;
pub use passthrough::*;

// self
use crate::{
	_prelude::*,
	audit::AuditSink,
	auth::{DomainKey, EntitlementCatalog},
	config::GateConfig,
	connector::ConnectorGateway,
	store::{ConfigStore, DomainStore, GroupStore, IdentityStore, RealmStore, ResourceStore},
};

type AttemptKey = (DomainKey, String);

/// Every external contract the gate talks to.
#[derive(Clone)]
pub struct Collaborators {
	/// Domain registry.
	pub domains: Arc<dyn DomainStore>,
	/// Per-domain configuration values.
	pub config: Arc<dyn ConfigStore>,
	/// Identity reads and the bookkeeping write.
	pub identities: Arc<dyn IdentityStore>,
	/// Realm tree.
	pub realms: Arc<dyn RealmStore>,
	/// External resource bindings.
	pub resources: Arc<dyn ResourceStore>,
	/// Group ownership.
	pub groups: Arc<dyn GroupStore>,
	/// Passthrough connector gateway.
	pub connectors: Arc<dyn ConnectorGateway>,
	/// Audit trail.
	pub audit: Arc<dyn AuditSink>,
}
impl Collaborators {
	/// Wires every store contract to a single directory implementation.
	pub fn from_directory<D>(
		directory: Arc<D>,
		connectors: Arc<dyn ConnectorGateway>,
		audit: Arc<dyn AuditSink>,
	) -> Self
	where
		D: 'static
			+ DomainStore
			+ ConfigStore
			+ IdentityStore
			+ RealmStore
			+ ResourceStore
			+ GroupStore,
	{
		Self {
			domains: directory.clone(),
			config: directory.clone(),
			identities: directory.clone(),
			realms: directory.clone(),
			resources: directory.clone(),
			groups: directory,
			connectors,
			audit,
		}
	}
}
impl Debug for Collaborators {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Collaborators").finish_non_exhaustive()
	}
}

/// Authentication and entitlement-resolution facade.
///
/// The gate owns its collaborators and static configuration; everything tenant-specific
/// travels in the [`DomainContext`] returned by [`Gate::resolve_domain`], so one gate can serve
/// every domain concurrently.
#[derive(Clone)]
pub struct Gate {
	/// External contracts.
	pub collaborators: Collaborators,
	/// Static configuration.
	pub config: GateConfig,
	/// Shared counters for authentication outcomes.
	pub metrics: Arc<AuthenticationMetrics>,
	catalog: EntitlementCatalog,
	attempt_guards: Arc<Mutex<HashMap<AttemptKey, Arc<AsyncMutex<()>>>>>,
}
impl Gate {
	/// Creates a gate without validating `config`.
	pub fn new(collaborators: Collaborators, config: GateConfig) -> Self {
		let catalog = config.catalog();

		Self {
			collaborators,
			config,
			metrics: Default::default(),
			catalog,
			attempt_guards: Default::default(),
		}
	}

	/// Validates `config` before creating the gate.
	pub fn try_new(collaborators: Collaborators, config: GateConfig) -> Result<Self> {
		config.validate()?;

		Ok(Self::new(collaborators, config))
	}

	/// Every entitlement name the gate knows about.
	pub fn catalog(&self) -> &EntitlementCatalog {
		&self.catalog
	}
}
impl Debug for Gate {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Gate")
			.field("config", &self.config)
			.field("catalog_len", &self.catalog.len())
			.field("metrics", &self.metrics)
			.finish()
	}
}
