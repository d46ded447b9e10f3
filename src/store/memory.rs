//! Thread-safe in-memory directory implementing every store contract, for local development
//! and tests.

// self
use crate::{
	_prelude::*,
	auth::{DomainKey, GroupKey, IdentityKey, RealmPath, ResourceKey, RoleKey},
	model::{Domain, ExternalResource, Group, Identity, Realm, Role},
	store::{
		ConfigStore, DomainStore, GroupStore, IdentityStore, RealmStore, ResourceStore,
		StoreError, StoreFuture,
	},
};

/// Everything the directory holds for a single domain.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Partition {
	/// The domain itself.
	pub domain: Domain,
	/// Configuration values by key.
	#[serde(default)]
	pub config: BTreeMap<String, Vec<String>>,
	/// Realms by full path.
	#[serde(default)]
	pub realms: BTreeMap<RealmPath, Realm>,
	/// External resources by key.
	#[serde(default)]
	pub resources: BTreeMap<ResourceKey, ExternalResource>,
	/// Roles by key.
	#[serde(default)]
	pub roles: BTreeMap<RoleKey, Role>,
	/// Materialized dynamic role memberships.
	#[serde(default)]
	pub dynamic_memberships: BTreeMap<RoleKey, BTreeSet<IdentityKey>>,
	/// Groups by key.
	#[serde(default)]
	pub groups: BTreeMap<GroupKey, Group>,
	/// Identities by username.
	#[serde(default)]
	pub identities: BTreeMap<String, Identity>,
}
impl Partition {
	/// Creates an empty partition for `domain`.
	pub fn new(domain: Domain) -> Self {
		Self {
			domain,
			config: BTreeMap::new(),
			realms: BTreeMap::new(),
			resources: BTreeMap::new(),
			roles: BTreeMap::new(),
			dynamic_memberships: BTreeMap::new(),
			groups: BTreeMap::new(),
			identities: BTreeMap::new(),
		}
	}

	fn assigned_resources(&self, identity: &Identity) -> Vec<ExternalResource> {
		identity.resources.iter().filter_map(|key| self.resources.get(key).cloned()).collect()
	}

	fn effective_roles(&self, identity: &Identity) -> Vec<Role> {
		let dynamic = self
			.dynamic_memberships
			.iter()
			.filter(|(_, members)| members.contains(&identity.key))
			.map(|(role, _)| role);
		let mut seen = BTreeSet::new();

		identity
			.roles
			.iter()
			.chain(dynamic)
			.filter(|key| seen.insert((*key).clone()))
			.filter_map(|key| self.roles.get(key).cloned())
			.collect()
	}

	fn ancestors(&self, realm: &RealmPath) -> Vec<Realm> {
		realm.lineage().iter().filter_map(|path| self.realms.get(path).cloned()).collect()
	}

	fn owned_groups(&self, owner: &IdentityKey) -> Vec<Group> {
		self.groups.values().filter(|group| group.user_owner.as_ref() == Some(owner)).cloned().collect()
	}
}

/// Serializable snapshot of every partition.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Directory {
	/// Partitions by domain key.
	#[serde(default)]
	pub partitions: BTreeMap<DomainKey, Partition>,
}
impl Directory {
	/// Returns the partition for `domain`, registering the domain when missing.
	pub fn partition_mut(&mut self, domain: &DomainKey) -> &mut Partition {
		self.partitions
			.entry(domain.clone())
			.or_insert_with(|| Partition::new(Domain::new(domain.clone())))
	}

	/// Replaces the stored copy of `identity` in its domain.
	pub fn save_identity(&mut self, identity: Identity) -> Result<(), StoreError> {
		let partition = self
			.partitions
			.get_mut(&identity.domain)
			.ok_or_else(|| StoreError::MissingDomain { domain: identity.domain.to_string() })?;

		partition.identities.insert(identity.username.clone(), identity);

		Ok(())
	}

	fn partition(&self, domain: &DomainKey) -> Option<&Partition> {
		self.partitions.get(domain)
	}

	pub(crate) fn find_domain(&self, key: &DomainKey) -> Option<Domain> {
		self.partition(key).map(|partition| partition.domain.clone())
	}

	pub(crate) fn config_values(&self, domain: &DomainKey, key: &str) -> Option<Vec<String>> {
		self.partition(domain).and_then(|partition| partition.config.get(key).cloned())
	}

	pub(crate) fn find_identity(&self, domain: &DomainKey, username: &str) -> Option<Identity> {
		self.partition(domain).and_then(|partition| partition.identities.get(username).cloned())
	}

	pub(crate) fn assigned_resources(&self, identity: &Identity) -> Vec<ExternalResource> {
		self.partition(&identity.domain)
			.map(|partition| partition.assigned_resources(identity))
			.unwrap_or_default()
	}

	pub(crate) fn effective_roles(&self, identity: &Identity) -> Vec<Role> {
		self.partition(&identity.domain)
			.map(|partition| partition.effective_roles(identity))
			.unwrap_or_default()
	}

	pub(crate) fn ancestors(&self, domain: &DomainKey, realm: &RealmPath) -> Vec<Realm> {
		self.partition(domain).map(|partition| partition.ancestors(realm)).unwrap_or_default()
	}

	pub(crate) fn find_resource(
		&self,
		domain: &DomainKey,
		key: &ResourceKey,
	) -> Option<ExternalResource> {
		self.partition(domain).and_then(|partition| partition.resources.get(key).cloned())
	}

	pub(crate) fn owned_groups(&self, domain: &DomainKey, owner: &IdentityKey) -> Vec<Group> {
		self.partition(domain).map(|partition| partition.owned_groups(owner)).unwrap_or_default()
	}
}

type DirectoryHandle = Arc<RwLock<Directory>>;

/// Thread-safe directory that keeps every partition in-process for tests and demos.
///
/// Seeding any record registers its domain.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(pub(crate) DirectoryHandle);
impl MemoryStore {
	/// Wraps an existing directory snapshot.
	pub fn from_directory(directory: Directory) -> Self {
		Self(Arc::new(RwLock::new(directory)))
	}

	/// Returns a copy of the whole directory.
	pub fn snapshot(&self) -> Directory {
		self.0.read().clone()
	}

	/// Registers a domain.
	pub fn insert_domain(&self, domain: Domain) {
		let key = domain.key.clone();

		self.0.write().partition_mut(&key).domain = domain;
	}

	/// Sets the values configured under `key`.
	pub fn set_config<I, S>(&self, domain: &DomainKey, key: &str, values: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.0
			.write()
			.partition_mut(domain)
			.config
			.insert(key.to_owned(), values.into_iter().map(Into::into).collect());
	}

	/// Inserts or replaces a realm.
	pub fn insert_realm(&self, domain: &DomainKey, realm: Realm) {
		self.0.write().partition_mut(domain).realms.insert(realm.path.clone(), realm);
	}

	/// Inserts or replaces an external resource.
	pub fn insert_resource(&self, domain: &DomainKey, resource: ExternalResource) {
		self.0.write().partition_mut(domain).resources.insert(resource.key.clone(), resource);
	}

	/// Inserts or replaces a role.
	pub fn insert_role(&self, domain: &DomainKey, role: Role) {
		self.0.write().partition_mut(domain).roles.insert(role.key.clone(), role);
	}

	/// Records that `identity` is a dynamic member of `role`.
	pub fn assign_dynamic_role(&self, domain: &DomainKey, role: RoleKey, identity: IdentityKey) {
		self.0
			.write()
			.partition_mut(domain)
			.dynamic_memberships
			.entry(role)
			.or_default()
			.insert(identity);
	}

	/// Inserts or replaces a group.
	pub fn insert_group(&self, domain: &DomainKey, group: Group) {
		self.0.write().partition_mut(domain).groups.insert(group.key.clone(), group);
	}

	/// Inserts or replaces an identity in its domain.
	pub fn insert_identity(&self, identity: Identity) {
		let mut guard = self.0.write();

		guard.partition_mut(&identity.domain).identities.insert(identity.username.clone(), identity);
	}

	/// Returns the stored copy of an identity.
	pub fn identity(&self, domain: &DomainKey, username: &str) -> Option<Identity> {
		self.0.read().find_identity(domain, username)
	}
}
impl DomainStore for MemoryStore {
	fn find_domain<'a>(&'a self, key: &'a DomainKey) -> StoreFuture<'a, Option<Domain>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().find_domain(key)) })
	}
}
impl ConfigStore for MemoryStore {
	fn get_values<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a str,
	) -> StoreFuture<'a, Option<Vec<String>>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().config_values(domain, key)) })
	}
}
impl IdentityStore for MemoryStore {
	fn find_by_name<'a>(
		&'a self,
		domain: &'a DomainKey,
		username: &'a str,
	) -> StoreFuture<'a, Option<Identity>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().find_identity(domain, username)) })
	}

	fn save(&self, identity: Identity) -> StoreFuture<'_, ()> {
		let directory = self.0.clone();

		Box::pin(async move { directory.write().save_identity(identity) })
	}

	fn find_assigned_resources<'a>(
		&'a self,
		identity: &'a Identity,
	) -> StoreFuture<'a, Vec<ExternalResource>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().assigned_resources(identity)) })
	}

	fn find_effective_roles<'a>(&'a self, identity: &'a Identity) -> StoreFuture<'a, Vec<Role>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().effective_roles(identity)) })
	}
}
impl RealmStore for MemoryStore {
	fn find_ancestors<'a>(
		&'a self,
		domain: &'a DomainKey,
		realm: &'a RealmPath,
	) -> StoreFuture<'a, Vec<Realm>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().ancestors(domain, realm)) })
	}
}
impl ResourceStore for MemoryStore {
	fn find_resource<'a>(
		&'a self,
		domain: &'a DomainKey,
		key: &'a ResourceKey,
	) -> StoreFuture<'a, Option<ExternalResource>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().find_resource(domain, key)) })
	}
}
impl GroupStore for MemoryStore {
	fn find_owned_by<'a>(
		&'a self,
		domain: &'a DomainKey,
		owner: &'a IdentityKey,
	) -> StoreFuture<'a, Vec<Group>> {
		let directory = self.0.clone();

		Box::pin(async move { Ok(directory.read().owned_groups(domain, owner)) })
	}
}
