//! Domain resolution and the per-request settings snapshot every later flow consumes.

// self
use crate::{
	_prelude::*,
	auth::DomainKey,
	config::{AUTHENTICATION_STATUSES, LOG_LAST_LOGIN_DATE},
	flows::Gate,
	model::Domain,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

/// Per-domain settings read from the configuration store when the domain is resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainSettings {
	/// Statuses allowed to authenticate; `None` when the domain configures no allow-list.
	pub allowed_statuses: Option<BTreeSet<String>>,
	/// Whether successful logins record the last-login date.
	pub log_last_login: bool,
}
impl DomainSettings {
	/// Whether an identity with `status` may authenticate.
	///
	/// With an allow-list configured, an absent status is never allowed.
	pub fn allows_status(&self, status: Option<&str>) -> bool {
		match &self.allowed_statuses {
			None => true,
			Some(allowed) => status.is_some_and(|status| allowed.contains(status)),
		}
	}
}
impl Default for DomainSettings {
	fn default() -> Self {
		Self { allowed_statuses: None, log_last_login: true }
	}
}

/// Resolved tenant plus its settings snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainContext {
	/// Resolved domain.
	pub domain: Domain,
	/// Settings snapshot taken at resolution time.
	pub settings: DomainSettings,
}
impl DomainContext {
	/// Creates a context with default settings.
	pub fn new(domain: Domain) -> Self {
		Self { domain, settings: DomainSettings::default() }
	}

	/// Replaces the settings snapshot.
	pub fn with_settings(mut self, settings: DomainSettings) -> Self {
		self.settings = settings;

		self
	}

	/// Key of the resolved domain.
	pub fn key(&self) -> &DomainKey {
		&self.domain.key
	}
}

impl Gate {
	/// Resolves `key` to a registered domain and snapshots its settings.
	pub async fn resolve_domain(&self, key: &DomainKey) -> Result<DomainContext> {
		const KIND: FlowKind = FlowKind::DomainLookup;

		let span = FlowSpan::new(KIND, "resolve_domain");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let domain = self
					.collaborators
					.domains
					.find_domain(key)
					.await?
					.ok_or_else(|| Error::DomainNotFound { domain: key.to_string() })?;
				let config = &self.collaborators.config;
				let allowed_statuses = config
					.get_values(key, AUTHENTICATION_STATUSES)
					.await?
					.map(|values| values.into_iter().collect());
				let log_last_login = config.get_bool(key, LOG_LAST_LOGIN_DATE).await?.unwrap_or(true);

				Ok(DomainContext::new(domain)
					.with_settings(DomainSettings { allowed_statuses, log_last_login }))
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn allow_list(statuses: &[&str]) -> DomainSettings {
		DomainSettings {
			allowed_statuses: Some(statuses.iter().map(|status| (*status).to_owned()).collect()),
			log_last_login: true,
		}
	}

	#[test]
	fn status_allow_list_semantics() {
		assert!(DomainSettings::default().allows_status(None));
		assert!(DomainSettings::default().allows_status(Some("suspended-by-workflow")));
		assert!(allow_list(&["active"]).allows_status(Some("active")));
		assert!(!allow_list(&["active"]).allows_status(Some("created")));
		assert!(!allow_list(&["active"]).allows_status(None));
		assert!(!allow_list(&[]).allows_status(Some("active")));
	}
}
