// self
use authority_gate::{
	_preludet::*,
	audit::AuditOutcome,
	auth::{
		GroupKey, RealmPath, RoleKey,
		entitlement::{ANONYMOUS, GROUP_DELETE, GROUP_READ, GROUP_UPDATE, MUST_CHANGE_PASSWORD},
	},
	config::GateConfig,
	model::{Group, Identity, Role},
};

fn role_key(value: &str) -> RoleKey {
	RoleKey::new(value).expect("Role key fixture should be valid.")
}

fn realm(path: &str) -> RealmPath {
	RealmPath::new(path).expect("Realm path fixture should be valid.")
}

fn seed_identity(fixture: &TestGate, roles: &[&str], edit: impl FnOnce(&mut Identity)) -> Identity {
	let mut identity = identity_fixture(&fixture.domain, "c9b2dec2", "rossini", "password123");

	identity.roles = roles.iter().map(|role| role_key(role)).collect();
	edit(&mut identity);
	fixture.store.insert_identity(identity.clone());

	identity
}

fn realms(values: &[&str]) -> BTreeSet<String> {
	values.iter().map(|value| (*value).to_owned()).collect()
}

#[tokio::test]
async fn anonymous_identifier_resolves_to_anonymous_only() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let mut impostor = identity_fixture(&fixture.domain, "0a1b2c3d", "anonymous", "password123");

	impostor.roles = vec![role_key("Other")];
	fixture.store.insert_role(
		&fixture.domain,
		Role::new(role_key("Other"), ["USER_READ"], vec![RealmPath::root()]),
	);
	fixture.store.insert_identity(impostor);

	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let authorities = fixture.gate.resolve_entitlements(&ctx, "anonymous").await?.into_authorities();

	assert_eq!(authorities.len(), 1);
	assert_eq!(authorities[0].entitlement, ANONYMOUS);
	assert!(authorities[0].is_global());

	Ok(())
}

#[tokio::test]
async fn admin_identifier_gets_every_known_entitlement_on_the_root_realm() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default().with_extra_entitlements(["REPORT_EXPORT"]));
	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let authorities = fixture.gate.resolve_entitlements(&ctx, "admin").await?;

	assert_eq!(authorities.len(), fixture.gate.catalog().len());
	assert!(authorities.contains("REPORT_EXPORT"));
	assert!(authorities.contains(ANONYMOUS));
	assert!(authorities.iter().all(|(_, scopes)| *scopes == realms(&[RealmPath::ROOT])));

	Ok(())
}

#[tokio::test]
async fn must_change_password_hides_role_authorities() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());

	for role in ["Other", "User-manager"] {
		fixture.store.insert_role(
			&fixture.domain,
			Role::new(role_key(role), ["USER_READ", "USER_UPDATE"], vec![realm("/even")]),
		);
	}

	seed_identity(&fixture, &["Other", "User-manager"], |identity| {
		identity.must_change_password = true;
	});

	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let authorities = fixture.gate.resolve_entitlements(&ctx, "rossini").await?.into_authorities();

	assert_eq!(authorities.len(), 1);
	assert_eq!(authorities[0].entitlement, MUST_CHANGE_PASSWORD);
	assert!(authorities[0].is_global());

	Ok(())
}

#[tokio::test]
async fn same_entitlement_from_two_roles_merges_realms() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());

	fixture
		.store
		.insert_role(&fixture.domain, Role::new(role_key("role-a"), ["FOO"], vec![realm("/a")]));
	fixture
		.store
		.insert_role(&fixture.domain, Role::new(role_key("role-b"), ["FOO"], vec![realm("/b")]));
	seed_identity(&fixture, &["role-a", "role-b"], |_| {});

	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let authorities = fixture.gate.resolve_entitlements(&ctx, "rossini").await?.into_authorities();

	assert_eq!(authorities.len(), 1);
	assert_eq!(authorities[0].entitlement, "FOO");
	assert_eq!(authorities[0].realms, realms(&["/a", "/b"]));

	Ok(())
}

#[tokio::test]
async fn globally_granted_role_entitlement_stays_global() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());

	fixture.store.insert_role(&fixture.domain, Role::new(role_key("role-a"), ["FOO"], vec![]));
	fixture
		.store
		.insert_role(&fixture.domain, Role::new(role_key("role-b"), ["FOO"], vec![realm("/a")]));
	seed_identity(&fixture, &["role-a", "role-b"], |_| {});

	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let authorities = fixture.gate.resolve_entitlements(&ctx, "rossini").await?.into_authorities();

	assert_eq!(authorities.len(), 1);
	assert!(authorities[0].is_global());

	Ok(())
}

#[tokio::test]
async fn dynamic_roles_and_owned_groups_contribute() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let identity = seed_identity(&fixture, &[], |_| {});

	fixture.store.insert_role(
		&fixture.domain,
		Role::new(role_key("Search-for-realm-evenTwo"), ["USER_READ"], vec![realm("/even/two")]),
	);
	fixture.store.assign_dynamic_role(
		&fixture.domain,
		role_key("Search-for-realm-evenTwo"),
		identity.key.clone(),
	);
	fixture.store.insert_group(
		&fixture.domain,
		Group {
			key: GroupKey::new("additional")?,
			realm: realm("/even"),
			user_owner: Some(identity.key.clone()),
		},
	);

	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let authorities = fixture.gate.resolve_entitlements(&ctx, "rossini").await?;

	assert_eq!(authorities.len(), 4);
	assert_eq!(authorities.realms("USER_READ"), Some(&realms(&["/even/two"])));

	for entitlement in [GROUP_READ, GROUP_UPDATE, GROUP_DELETE] {
		assert_eq!(authorities.realms(entitlement), Some(&realms(&["/even@additional"])));
	}

	let events = fixture.audit.events();

	assert_eq!(events.len(), 1);
	assert_eq!(events[0].outcome, AuditOutcome::Success);

	Ok(())
}

#[tokio::test]
async fn unknown_username_is_an_error() -> color_eyre::Result<()> {
	let fixture = build_test_gate(GateConfig::default());
	let ctx = fixture.gate.resolve_domain(&fixture.domain).await?;
	let err = fixture
		.gate
		.resolve_entitlements(&ctx, "ghost")
		.await
		.expect_err("Unknown usernames should not resolve.");

	assert!(matches!(err, Error::UnknownIdentity { ref username } if username == "ghost"));

	let events = fixture.audit.events();

	assert_eq!(events.len(), 1);
	assert_eq!(events[0].outcome, AuditOutcome::Failure);
	assert_eq!(events[0].identity.as_deref(), Some("ghost"));

	Ok(())
}
