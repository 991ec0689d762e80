//! Adapter abstracting the document store.
//!
//! The durable database is an external collaborator: a key-scoped,
//! collection-oriented store with get/set/transaction/query semantics.
//! Every method is expected to resolve or fail within the caller's bounded
//! timeout; callers treat timeouts on security-relevant reads as denial.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::identity_adapter::StoredRole;
use crate::notification::Notification;
use crate::prelude::*;
use crate::security::{AuditEntry, AuditKind, SecurityEvent};

/// Public profile attributes the guard pipeline reads.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
	pub user_id: Box<str>,
	pub name: Box<str>,
	pub verified: bool,
	pub follower_count: u32,
	pub created_at: Timestamp,
}

/// Sliding-window counter state for one (action, subject) pair.
///
/// `events` holds the timestamps of recorded events; entries older than the
/// window are pruned lazily on every check, so `events.len()` only reflects
/// in-window activity after pruning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateWindow {
	pub events: Vec<i64>,
	pub blocked_until: Option<Timestamp>,
}

impl RateWindow {
	/// Drop events older than `window_secs` before `now`.
	pub fn prune(&mut self, now: Timestamp, window_secs: i64) {
		let cutoff = now.0 - window_secs;
		self.events.retain(|&at| at > cutoff);
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ListNotificationsOptions {
	pub unread_only: bool,
	pub limit: Option<u32>,
}

/// A Flock document store adapter.
///
/// Rate windows use optimistic concurrency: `load_rate_window` returns a
/// version (0 when absent) and `store_rate_window` succeeds only when the
/// stored version still matches, so concurrent increments cannot both pass
/// a boundary check.
#[async_trait]
pub trait MetaAdapter: Debug + Send + Sync {
	// Profiles
	async fn read_profile(&self, user_id: &str) -> FlResult<Option<Profile>>;

	// Resource authorship
	async fn read_post_author(&self, post_id: &str) -> FlResult<Option<Box<str>>>;
	async fn read_comment_author(&self, comment_id: &str) -> FlResult<Option<Box<str>>>;

	/// Whether a block exists between the two users in either direction.
	async fn is_blocked(&self, user_a: &str, user_b: &str) -> FlResult<bool>;

	// Notifications
	async fn create_notification(&self, notification: &Notification) -> FlResult<()>;
	async fn list_notifications(
		&self,
		user_id: &str,
		opts: &ListNotificationsOptions,
	) -> FlResult<Vec<Notification>>;
	async fn mark_notification_read(&self, user_id: &str, notification_id: &str) -> FlResult<()>;
	/// Returns the number of notifications actually deleted.
	async fn delete_notifications(&self, notification_ids: &[Box<str>]) -> FlResult<u32>;

	// Security events and audit log (append-only)
	async fn append_security_event(&self, event: &SecurityEvent) -> FlResult<()>;
	async fn append_audit_entry(&self, entry: &AuditEntry) -> FlResult<()>;
	async fn count_audit_entries(&self, kind: AuditKind) -> FlResult<u32>;

	// Stored role (advisory authorization view)
	async fn read_stored_role(&self, user_id: &str) -> FlResult<Option<StoredRole>>;
	async fn update_stored_role(&self, user_id: &str, role: Option<&StoredRole>) -> FlResult<()>;

	// Rate windows (versioned read-modify-write)
	async fn load_rate_window(&self, key: &str) -> FlResult<(RateWindow, u64)>;
	/// Returns false when the expected version no longer matches (conflict).
	async fn store_rate_window(
		&self,
		key: &str,
		window: &RateWindow,
		expected_version: u64,
	) -> FlResult<bool>;

	// Coordinated-attack evidence: recent events by target + type
	async fn record_target_event(
		&self,
		target_id: &str,
		typ: &str,
		sender_id: &str,
		at: Timestamp,
	) -> FlResult<()>;
	async fn distinct_senders_since(
		&self,
		target_id: &str,
		typ: &str,
		since: Timestamp,
	) -> FlResult<u32>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_rate_window_prune() {
		let mut window = RateWindow { events: vec![10, 50, 90, 100], blocked_until: None };
		window.prune(Timestamp(100), 30);
		assert_eq!(window.events, vec![90, 100]);
	}

	#[test]
	fn test_rate_window_prune_keeps_boundary_open() {
		// An event exactly window_secs old is stale
		let mut window = RateWindow { events: vec![70, 71], blocked_until: None };
		window.prune(Timestamp(100), 30);
		assert_eq!(window.events, vec![71]);
	}
}

// vim: ts=4
