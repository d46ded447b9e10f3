// self
use authority_gate::{
	_preludet::*,
	auth::{PolicyKey, RealmPath, ResourceKey},
	config::GateConfig,
	model::{AccountPolicy, ConnObjectKeyItem, ExternalResource, Identity, Realm},
};

fn key(value: &str) -> ResourceKey {
	ResourceKey::new(value).expect("Resource fixture should be valid.")
}

fn realm(path: &str) -> RealmPath {
	RealmPath::new(path).expect("Realm path fixture should be valid.")
}

fn policy(name: &str, resources: &[&str]) -> AccountPolicy {
	AccountPolicy::new(
		PolicyKey::new(name).expect("Policy key fixture should be valid."),
		resources.iter().map(|resource| key(resource)),
	)
}

fn resource(value: &str) -> ExternalResource {
	ExternalResource::new(key(value)).with_object_key(ConnObjectKeyItem::Username)
}

fn seed_identity(fixture: &TestGate, resources: &[&str]) -> Identity {
	let mut identity = identity_fixture(&fixture.domain, "74cd8ece", "bellini", "password123");

	identity.realm = realm("/even/two");
	identity.resources = resources.iter().map(|resource| key(resource)).collect();
	fixture.store.insert_identity(identity.clone());

	identity
}

fn selected_keys(resources: Vec<ExternalResource>) -> Vec<String> {
	resources.into_iter().map(|resource| resource.key.to_string()).collect()
}

#[tokio::test]
async fn policy_bearing_contributors_intersect_and_plain_resources_are_transparent()
-> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let domain = &fixture.domain;

	fixture.store.insert_resource(domain, resource("A").with_account_policy(policy("a", &["R1"])));
	fixture.store.insert_resource(domain, resource("B"));
	fixture.store.insert_resource(domain, resource("R1"));
	fixture.store.insert_resource(domain, resource("R2"));
	fixture.store.insert_realm(domain, Realm::new(RealmPath::root()));
	fixture
		.store
		.insert_realm(domain, Realm::new(realm("/even")).with_account_policy(policy("even", &["R1", "R2"])));
	fixture.store.insert_realm(domain, Realm::new(realm("/even/two")));

	let identity = seed_identity(&fixture, &["A", "B"]);
	let ctx = fixture.gate.resolve_domain(domain).await?;
	let selected = fixture.gate.select_passthrough_resources(&ctx, &identity).await?;

	assert_eq!(selected_keys(selected), vec!["R1"]);

	Ok(())
}

#[tokio::test]
async fn no_policy_anywhere_selects_nothing() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let domain = &fixture.domain;

	fixture.store.insert_resource(domain, resource("A"));
	fixture.store.insert_resource(domain, resource("R1"));
	fixture.store.insert_realm(domain, Realm::new(RealmPath::root()));
	fixture
		.store
		.insert_realm(domain, Realm::new(realm("/even")).with_account_policy(policy("empty", &[])));

	let identity = seed_identity(&fixture, &["A"]);
	let ctx = fixture.gate.resolve_domain(domain).await?;

	assert!(fixture.gate.select_passthrough_resources(&ctx, &identity).await?.is_empty());

	Ok(())
}

#[tokio::test]
async fn realm_policy_alone_selects_in_key_order_and_skips_unknown_keys() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let domain = &fixture.domain;

	fixture.store.insert_resource(domain, resource("resource-ldap"));
	fixture.store.insert_resource(domain, resource("resource-ad"));
	fixture.store.insert_realm(
		domain,
		Realm::new(RealmPath::root())
			.with_account_policy(policy("root", &["resource-ldap", "resource-gone", "resource-ad"])),
	);

	let identity = seed_identity(&fixture, &[]);
	let ctx = fixture.gate.resolve_domain(domain).await?;
	let selected = fixture.gate.select_passthrough_resources(&ctx, &identity).await?;

	assert_eq!(selected_keys(selected), vec!["resource-ad", "resource-ldap"]);

	Ok(())
}

#[tokio::test]
async fn disjoint_policies_leave_nothing_eligible() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let domain = &fixture.domain;

	fixture.store.insert_resource(domain, resource("A").with_account_policy(policy("a", &["R1"])));
	fixture.store.insert_resource(domain, resource("R1"));
	fixture.store.insert_resource(domain, resource("R2"));
	fixture
		.store
		.insert_realm(domain, Realm::new(RealmPath::root()).with_account_policy(policy("root", &["R2"])));

	let identity = seed_identity(&fixture, &["A"]);
	let ctx = fixture.gate.resolve_domain(domain).await?;

	assert!(fixture.gate.select_passthrough_resources(&ctx, &identity).await?.is_empty());

	Ok(())
}
