//! Security event and admin audit records.
//!
//! Both collections are append-only for this codebase; retention and
//! cleanup belong to the external cron job.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::prelude::*;

/// Kinds of security-relevant events the guard pipeline records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityEventKind {
	/// A threat signature matched in submitted content
	ThreatDetected,
	/// Per-IP ceiling breached (likely automation)
	IpRateLimitExceeded,
	/// Recipient's incoming-notification protection ceiling breached
	TargetFlood,
	/// Distinct-sender threshold against one target reached
	CoordinatedAttack,
	/// Stored role claims more privilege than the signed claims grant
	PrivilegeEscalationAttempt,
}

impl SecurityEventKind {
	pub fn as_str(self) -> &'static str {
		match self {
			SecurityEventKind::ThreatDetected => "threat_detected",
			SecurityEventKind::IpRateLimitExceeded => "ip_rate_limit_exceeded",
			SecurityEventKind::TargetFlood => "target_flood",
			SecurityEventKind::CoordinatedAttack => "coordinated_attack",
			SecurityEventKind::PrivilegeEscalationAttempt => "privilege_escalation_attempt",
		}
	}
}

/// Append-only violation/audit record for adversarial behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEvent {
	pub kind: SecurityEventKind,
	pub actor_id: Box<str>,
	/// Kind-specific payload (matched signature class, both authority
	/// views, sender counts, ...)
	pub detail: serde_json::Value,
	pub created_at: Timestamp,
}

impl SecurityEvent {
	pub fn new(kind: SecurityEventKind, actor_id: &str, detail: serde_json::Value) -> Self {
		Self { kind, actor_id: actor_id.into(), detail, created_at: Timestamp::now() }
	}
}

/// Kinds of audited admin actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
	AdminPrivilegesGranted,
	AdminPrivilegesRevoked,
	NotificationsDeleted,
}

impl AuditKind {
	pub fn as_str(self) -> &'static str {
		match self {
			AuditKind::AdminPrivilegesGranted => "admin_privileges_granted",
			AuditKind::AdminPrivilegesRevoked => "admin_privileges_revoked",
			AuditKind::NotificationsDeleted => "notifications_deleted",
		}
	}
}

/// Append-only audit record for admin actions. The reason is supplied by a
/// human and must be non-empty.
#[skip_serializing_none]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
	pub kind: AuditKind,
	pub executor_id: Box<str>,
	pub target_id: Box<str>,
	pub prior_permissions: Vec<Box<str>>,
	pub new_permissions: Vec<Box<str>>,
	pub reason: Box<str>,
	pub created_at: Timestamp,
}

// vim: ts=4
