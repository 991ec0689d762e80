//! The admin privilege guard.
//!
//! Authorization decisions trust the signed claims ONLY. The stored role in
//! the document store is read alongside, but its sole purpose is anomaly
//! detection: if the store claims more privilege than the token grants,
//! somebody tampered with the store (or a revocation has not propagated),
//! and that discrepancy is itself a security event. It never widens access.

use flock_types::identity_adapter::{AdminLevel, AuthCtx, StoredRole};
use flock_types::security::SecurityEventKind;

use crate::prelude::*;
use crate::utils::bounded;

/// Whether the advisory stored role would grant `permission`.
fn stored_grants(role: &StoredRole, permission: &str) -> bool {
	if role.role == Some(AdminLevel::SuperAdmin) {
		return true;
	}
	role.permissions.contains(permission)
		|| role.role.is_some_and(|level| level.default_permissions().contains(permission))
}

/// Advisory stored-role read; a store failure cannot change the decision.
async fn read_stored_role(app: &App, actor: &AuthCtx) -> Option<StoredRole> {
	let timeout_ms = app.config.rate_limit.store_timeout_ms;
	bounded(timeout_ms, "stored role read", app.meta_adapter.read_stored_role(&actor.user_id))
		.await
		.unwrap_or_else(|e| {
			warn!(subject = %actor.user_id, "Stored role read failed during authorization: {}", e);
			None
		})
}

/// Authorize `actor` for `permission`.
///
/// Denies unless the claims grant it. When the stored role disagrees in the
/// actor's favor, a `privilege_escalation_attempt` event capturing both
/// views is recorded before the denial.
pub async fn authorize(app: &App, actor: &AuthCtx, permission: &str) -> FlResult<()> {
	if actor.claims.has_permission(permission) {
		return Ok(());
	}

	if let Some(stored) = read_stored_role(app, actor).await {
		if stored_grants(&stored, permission) {
			warn!(
				subject = %actor.user_id,
				permission,
				stored_role = ?stored.role,
				"Stored role exceeds signed claims"
			);
			app.security
				.report(
					SecurityEventKind::PrivilegeEscalationAttempt,
					&actor.user_id,
					serde_json::json!({
						"permission": permission,
						"claims": actor.claims,
						"stored": stored,
					}),
				)
				.await;
			return Err(Error::PermissionDenied);
		}
	}

	warn!(subject = %actor.user_id, permission, "Permission denied");
	Err(Error::PermissionDenied)
}

/// Claims-level admin gate for the admin route group.
///
/// Same dual-source rule as [`authorize`]: only the signed claims admit.
/// A stored role carrying any admin level for an actor whose token has no
/// admin claims is recorded as an escalation attempt before the denial.
pub async fn ensure_admin_claims(app: &App, actor: &AuthCtx) -> FlResult<()> {
	if actor.claims.admin || actor.claims.super_admin {
		return Ok(());
	}

	if let Some(stored) = read_stored_role(app, actor).await {
		if stored.role.is_some() {
			warn!(
				subject = %actor.user_id,
				stored_role = ?stored.role,
				"Stored role claims admin level absent from signed claims"
			);
			app.security
				.report(
					SecurityEventKind::PrivilegeEscalationAttempt,
					&actor.user_id,
					serde_json::json!({
						"permission": "admin",
						"claims": actor.claims,
						"stored": stored,
					}),
				)
				.await;
			return Err(Error::PermissionDenied);
		}
	}

	warn!(subject = %actor.user_id, "Admin permission denied - admin claims required");
	Err(Error::PermissionDenied)
}


// vim: ts=4
