//! Grant, revoke, and bootstrap of admin privileges.
//!
//! The grant path writes both authority views: the revocable claims bag at
//! the identity provider (the trusted one) and the stored role in the
//! document store (the advisory one). Every change carries a mandatory
//! human-supplied reason and lands in the audit log with the prior and new
//! permission sets.

use flock_core::sanitize;
use flock_types::identity_adapter::{AdminLevel, AuthCtx, ClaimsAuthority, StoredRole};
use flock_types::security::{AuditEntry, AuditKind};

use crate::guard;
use crate::prelude::*;

pub const PERM_MANAGE: &str = "admin.manage";

fn claims_for_level(level: AdminLevel) -> ClaimsAuthority {
	ClaimsAuthority {
		admin: true,
		super_admin: level == AdminLevel::SuperAdmin,
		permissions: level.default_permissions(),
	}
}

fn permission_list(claims: &ClaimsAuthority) -> Vec<Box<str>> {
	claims.permissions.iter().cloned().collect()
}

async fn write_audit(app: &App, entry: &AuditEntry) {
	if let Err(e) = app.meta_adapter.append_audit_entry(entry).await {
		warn!(executor = %entry.executor_id, kind = entry.kind.as_str(), "Failed to write audit entry: {}", e);
	}
}

fn validated_reason(reason: &str) -> FlResult<Box<str>> {
	let reason = sanitize::sanitize_input(reason);
	if reason.is_empty() {
		return Err(Error::InvalidArgument("reason must not be empty".into()));
	}
	Ok(reason.into())
}

/// Grant `level` to `target_id`. The executor must hold super admin
/// authority in their signed claims.
pub async fn set_admin_privileges(
	app: &App,
	executor: &AuthCtx,
	target_id: &str,
	level: AdminLevel,
	reason: &str,
) -> FlResult<ClaimsAuthority> {
	guard::authorize(app, executor, PERM_MANAGE).await?;
	if !executor.claims.super_admin {
		warn!(subject = %executor.user_id, "Privilege grant denied: super admin claims required");
		return Err(Error::PermissionDenied);
	}
	let reason = validated_reason(reason)?;

	app.meta_adapter.read_profile(target_id).await?.ok_or(Error::NotFound)?;

	let prior = app.identity_adapter.read_claims(target_id).await?;
	let new_claims = claims_for_level(level);

	app.identity_adapter.update_claims(target_id, &new_claims).await?;
	let stored = StoredRole { role: Some(level), permissions: new_claims.permissions.clone() };
	app.meta_adapter.update_stored_role(target_id, Some(&stored)).await?;

	write_audit(
		app,
		&AuditEntry {
			kind: AuditKind::AdminPrivilegesGranted,
			executor_id: executor.user_id.clone(),
			target_id: target_id.into(),
			prior_permissions: permission_list(&prior),
			new_permissions: permission_list(&new_claims),
			reason,
			created_at: Timestamp::now(),
		},
	)
	.await;

	info!(
		subject = %executor.user_id,
		target = %target_id,
		level = level.as_str(),
		"Admin privileges granted"
	);
	Ok(new_claims)
}

/// Revoke all admin privileges from `target_id`. Self-revocation is
/// rejected so an instance cannot end up without a super admin by accident.
pub async fn remove_admin_privileges(
	app: &App,
	executor: &AuthCtx,
	target_id: &str,
	reason: &str,
) -> FlResult<()> {
	guard::authorize(app, executor, PERM_MANAGE).await?;
	if !executor.claims.super_admin {
		warn!(subject = %executor.user_id, "Privilege revoke denied: super admin claims required");
		return Err(Error::PermissionDenied);
	}
	if &*executor.user_id == target_id {
		return Err(Error::InvalidArgument("cannot revoke your own privileges".into()));
	}
	let reason = validated_reason(reason)?;

	let prior = app.identity_adapter.read_claims(target_id).await?;
	app.identity_adapter.update_claims(target_id, &ClaimsAuthority::default()).await?;
	app.meta_adapter.update_stored_role(target_id, None).await?;

	write_audit(
		app,
		&AuditEntry {
			kind: AuditKind::AdminPrivilegesRevoked,
			executor_id: executor.user_id.clone(),
			target_id: target_id.into(),
			prior_permissions: permission_list(&prior),
			new_permissions: vec![],
			reason,
			created_at: Timestamp::now(),
		},
	)
	.await;

	info!(subject = %executor.user_id, target = %target_id, "Admin privileges revoked");
	Ok(())
}

/// Bootstrap the first super admin.
///
/// Permitted only while no grant has ever been audited, and only with the
/// configured setup key when one is set. Unlike the regular paths, the
/// audit write here must succeed: it is what closes the bootstrap window.
pub async fn create_initial_super_admin(
	app: &App,
	actor: &AuthCtx,
	setup_key: Option<&str>,
) -> FlResult<ClaimsAuthority> {
	let granted = app.meta_adapter.count_audit_entries(AuditKind::AdminPrivilegesGranted).await?;
	if granted > 0 {
		return Err(Error::FailedPrecondition("an admin has already been created".into()));
	}

	if let Some(expected) = app.config.setup_key.as_deref() {
		if setup_key != Some(expected) {
			warn!(subject = %actor.user_id, "Bootstrap denied: setup key mismatch");
			return Err(Error::PermissionDenied);
		}
	}

	app.meta_adapter.read_profile(&actor.user_id).await?.ok_or(Error::NotFound)?;

	let new_claims = claims_for_level(AdminLevel::SuperAdmin);
	app.identity_adapter.update_claims(&actor.user_id, &new_claims).await?;
	let stored = StoredRole {
		role: Some(AdminLevel::SuperAdmin),
		permissions: new_claims.permissions.clone(),
	};
	app.meta_adapter.update_stored_role(&actor.user_id, Some(&stored)).await?;

	app.meta_adapter
		.append_audit_entry(&AuditEntry {
			kind: AuditKind::AdminPrivilegesGranted,
			executor_id: actor.user_id.clone(),
			target_id: actor.user_id.clone(),
			prior_permissions: vec![],
			new_permissions: permission_list(&new_claims),
			reason: "initial super admin bootstrap".into(),
			created_at: Timestamp::now(),
		})
		.await?;

	info!(subject = %actor.user_id, "Initial super admin created");
	Ok(new_claims)
}

#[cfg(test)]
mod tests {
	use super::*;
	use flock_core::app::AppState;
	use flock_core::config::GuardConfig;
	use flock_core::rate_limit::MemoryCounterStore;
	use flock_identity_adapter_memory::IdentityAdapterMemory;
	use flock_meta_adapter_memory::MetaAdapterMemory;
	use flock_types::identity_adapter::IdentityAdapter;
	use flock_types::meta_adapter::{MetaAdapter, Profile};
	use std::sync::Arc;

	fn profile(user_id: &str) -> Profile {
		Profile {
			user_id: user_id.into(),
			name: user_id.into(),
			verified: false,
			follower_count: 0,
			created_at: Timestamp(0),
		}
	}

	struct Fixture {
		app: App,
		meta: Arc<MetaAdapterMemory>,
		identity: Arc<IdentityAdapterMemory>,
	}

	fn setup(config: GuardConfig) -> Fixture {
		let meta = Arc::new(MetaAdapterMemory::new());
		meta.seed_profile(profile("root"));
		meta.seed_profile(profile("mod"));
		let identity = Arc::new(IdentityAdapterMemory::new("test-secret"));
		let store = Arc::new(MemoryCounterStore::new(64));
		let app = AppState::new(config, meta.clone(), identity.clone(), store);
		Fixture { app, meta, identity }
	}

	fn super_admin(user_id: &str) -> AuthCtx {
		AuthCtx {
			user_id: user_id.into(),
			claims: claims_for_level(AdminLevel::SuperAdmin),
		}
	}

	#[tokio::test]
	async fn test_grant_writes_both_views_and_audits() {
		let f = setup(GuardConfig::default());
		let executor = super_admin("root");

		let claims =
			set_admin_privileges(&f.app, &executor, "mod", AdminLevel::Moderator, "new moderator")
				.await
				.unwrap();
		assert!(claims.admin);
		assert!(!claims.super_admin);
		assert!(claims.has_permission("notifications.moderate"));

		// Trusted view updated at the identity provider
		let live = f.identity.read_claims("mod").await.unwrap();
		assert_eq!(live, claims);

		let audit = f.meta.audit_entries();
		assert_eq!(audit.len(), 1);
		assert_eq!(audit[0].kind, AuditKind::AdminPrivilegesGranted);
		assert!(audit[0].prior_permissions.is_empty());
		assert_eq!(audit[0].new_permissions, vec![Box::from("notifications.moderate")]);
	}

	#[tokio::test]
	async fn test_grant_requires_super_admin_claims() {
		let f = setup(GuardConfig::default());
		let mut claims = ClaimsAuthority { admin: true, ..Default::default() };
		claims.permissions.insert(PERM_MANAGE.into());
		let executor = AuthCtx { user_id: "almost-root".into(), claims };

		let err = set_admin_privileges(&f.app, &executor, "mod", AdminLevel::Admin, "because")
			.await
			.unwrap_err();
		assert!(matches!(err, Error::PermissionDenied));
	}

	#[tokio::test]
	async fn test_grant_requires_reason() {
		let f = setup(GuardConfig::default());
		let err = set_admin_privileges(&f.app, &super_admin("root"), "mod", AdminLevel::Admin, "  ")
			.await
			.unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[tokio::test]
	async fn test_self_revocation_rejected() {
		let f = setup(GuardConfig::default());
		let err = remove_admin_privileges(&f.app, &super_admin("root"), "root", "cleanup")
			.await
			.unwrap_err();
		assert!(matches!(err, Error::InvalidArgument(_)));
	}

	#[tokio::test]
	async fn test_revoke_clears_both_views() {
		let f = setup(GuardConfig::default());
		let executor = super_admin("root");
		set_admin_privileges(&f.app, &executor, "mod", AdminLevel::Admin, "promotion")
			.await
			.unwrap();

		remove_admin_privileges(&f.app, &executor, "mod", "offboarding").await.unwrap();
		assert!(f.identity.read_claims("mod").await.unwrap().is_empty());
		assert!(f.meta.read_stored_role("mod").await.unwrap().is_none());

		let audit = f.meta.audit_entries();
		assert_eq!(audit.len(), 2);
		assert_eq!(audit[1].kind, AuditKind::AdminPrivilegesRevoked);
		assert_eq!(audit[1].prior_permissions.len(), 2);
	}

	#[tokio::test]
	async fn test_bootstrap_only_once() {
		let f = setup(GuardConfig::default());
		let actor = AuthCtx { user_id: "root".into(), claims: ClaimsAuthority::default() };

		let claims = create_initial_super_admin(&f.app, &actor, None).await.unwrap();
		assert!(claims.super_admin);

		// Second bootstrap attempt fails the precondition
		let other = AuthCtx { user_id: "mod".into(), claims: ClaimsAuthority::default() };
		let err = create_initial_super_admin(&f.app, &other, None).await.unwrap_err();
		assert!(matches!(err, Error::FailedPrecondition(_)));
	}

	#[tokio::test]
	async fn test_bootstrap_checks_setup_key() {
		let config = GuardConfig { setup_key: Some("s3cret".into()), ..Default::default() };
		let f = setup(config);
		let actor = AuthCtx { user_id: "root".into(), claims: ClaimsAuthority::default() };

		let err = create_initial_super_admin(&f.app, &actor, Some("wrong")).await.unwrap_err();
		assert!(matches!(err, Error::PermissionDenied));
		let err = create_initial_super_admin(&f.app, &actor, None).await.unwrap_err();
		assert!(matches!(err, Error::PermissionDenied));

		create_initial_super_admin(&f.app, &actor, Some("s3cret")).await.unwrap();
	}

	#[tokio::test]
	async fn test_bootstrap_blocked_after_regular_grant() {
		let f = setup(GuardConfig::default());
		set_admin_privileges(&f.app, &super_admin("root"), "mod", AdminLevel::Admin, "promotion")
			.await
			.unwrap();

		let actor = AuthCtx { user_id: "root".into(), claims: ClaimsAuthority::default() };
		let err = create_initial_super_admin(&f.app, &actor, None).await.unwrap_err();
		assert!(matches!(err, Error::FailedPrecondition(_)));
	}
}

// vim: ts=4
