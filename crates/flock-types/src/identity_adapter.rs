//! Adapter abstracting the identity provider.
//!
//! The identity provider issues a signed identity with an attached,
//! revocable claims bag. `ClaimsAuthority` is the ONLY trusted source for
//! authorization decisions; the stored role held in the document store is
//! advisory and compared against claims purely to detect escalation
//! attempts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::prelude::*;

/// Admin levels in ascending order of authority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminLevel {
	Moderator,
	Admin,
	SuperAdmin,
}

impl AdminLevel {
	pub fn as_str(self) -> &'static str {
		match self {
			AdminLevel::Moderator => "moderator",
			AdminLevel::Admin => "admin",
			AdminLevel::SuperAdmin => "super_admin",
		}
	}

	/// Default permission set granted with a level.
	pub fn default_permissions(self) -> BTreeSet<Box<str>> {
		let perms: &[&str] = match self {
			AdminLevel::Moderator => &["notifications.moderate"],
			AdminLevel::Admin => &["notifications.moderate", "notifications.system"],
			AdminLevel::SuperAdmin => {
				&["notifications.moderate", "notifications.system", "admin.manage"]
			}
		};
		perms.iter().map(|p| Box::from(*p)).collect()
	}
}

/// Authorization view carried in the signed, revocable claims token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsAuthority {
	#[serde(default)]
	pub admin: bool,
	#[serde(default)]
	pub super_admin: bool,
	#[serde(default)]
	pub permissions: BTreeSet<Box<str>>,
}

impl ClaimsAuthority {
	/// Whether these claims grant the named permission. Super admins hold
	/// every permission implicitly.
	pub fn has_permission(&self, permission: &str) -> bool {
		self.super_admin || self.permissions.contains(permission)
	}

	pub fn is_empty(&self) -> bool {
		!self.admin && !self.super_admin && self.permissions.is_empty()
	}
}

/// Authorization view held in the mutable document store. Useful for
/// display; never trusted for the allow decision.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRole {
	pub role: Option<AdminLevel>,
	#[serde(default)]
	pub permissions: BTreeSet<Box<str>>,
}

/// Context struct for an authenticated user.
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub user_id: Box<str>,
	pub claims: ClaimsAuthority,
}

/// A Flock identity provider adapter.
///
/// Responsible for verifying bearer tokens and for managing the revocable
/// claims bag attached to each identity.
#[async_trait]
pub trait IdentityAdapter: Debug + Send + Sync {
	/// Verifies a bearer token and returns the authenticated context,
	/// including the claims bag current at verification time.
	async fn verify_token(&self, token: &str) -> FlResult<AuthCtx>;

	/// Reads the current claims bag of a user.
	async fn read_claims(&self, user_id: &str) -> FlResult<ClaimsAuthority>;

	/// Replaces the claims bag of a user (grant/revoke path).
	async fn update_claims(&self, user_id: &str, claims: &ClaimsAuthority) -> FlResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_super_admin_holds_all_permissions() {
		let claims = ClaimsAuthority { super_admin: true, ..Default::default() };
		assert!(claims.has_permission("anything.at.all"));
	}

	#[test]
	fn test_explicit_permission() {
		let mut claims = ClaimsAuthority::default();
		assert!(!claims.has_permission("notifications.system"));
		claims.permissions.insert("notifications.system".into());
		assert!(claims.has_permission("notifications.system"));
	}

	#[test]
	fn test_level_ordering() {
		assert!(AdminLevel::Moderator < AdminLevel::Admin);
		assert!(AdminLevel::Admin < AdminLevel::SuperAdmin);
	}
}

// vim: ts=4
