//! In-memory MetaAdapter implementation.
//!
//! Backs single-instance deployments and the test suites. All collections
//! live behind one `RwLock`; the versioned rate-window slots implement the
//! same optimistic-concurrency contract a durable document store would.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap, HashSet};

use flock::identity_adapter::StoredRole;
use flock::meta_adapter::{self, ListNotificationsOptions, Profile, RateWindow};
use flock::notification::Notification;
use flock::prelude::*;
use flock::security::{AuditEntry, AuditKind, SecurityEvent};

#[derive(Debug, Default)]
struct Inner {
	profiles: HashMap<Box<str>, Profile>,
	post_authors: HashMap<Box<str>, Box<str>>,
	comment_authors: HashMap<Box<str>, Box<str>>,
	/// Directed blocker -> blocked pairs
	blocks: HashSet<(Box<str>, Box<str>)>,
	notifications: Vec<Notification>,
	security_events: Vec<SecurityEvent>,
	audit_entries: Vec<AuditEntry>,
	stored_roles: HashMap<Box<str>, StoredRole>,
	rate_windows: HashMap<Box<str>, (RateWindow, u64)>,
	target_events: HashMap<Box<str>, Vec<(Box<str>, i64)>>,
}

#[derive(Debug, Default)]
pub struct MetaAdapterMemory {
	inner: RwLock<Inner>,
}

impl MetaAdapterMemory {
	pub fn new() -> Self {
		Self::default()
	}

	// Seed helpers for tests and bootstrap fixtures //
	//***********************************************//

	pub fn seed_profile(&self, profile: Profile) {
		let mut inner = self.inner.write();
		inner.profiles.insert(profile.user_id.clone(), profile);
	}

	pub fn seed_post(&self, post_id: &str, author_id: &str) {
		self.inner.write().post_authors.insert(post_id.into(), author_id.into());
	}

	pub fn seed_comment(&self, comment_id: &str, author_id: &str) {
		self.inner.write().comment_authors.insert(comment_id.into(), author_id.into());
	}

	/// Record that `blocker` blocks `blocked` (directed).
	pub fn seed_block(&self, blocker: &str, blocked: &str) {
		self.inner.write().blocks.insert((blocker.into(), blocked.into()));
	}

	// Inspection helpers for tests //
	//******************************//

	pub fn security_events(&self) -> Vec<SecurityEvent> {
		self.inner.read().security_events.clone()
	}

	pub fn audit_entries(&self) -> Vec<AuditEntry> {
		self.inner.read().audit_entries.clone()
	}

	pub fn notification_count(&self, user_id: &str) -> usize {
		self.inner.read().notifications.iter().filter(|n| &*n.user_id == user_id).count()
	}
}

fn target_key(target_id: &str, typ: &str) -> Box<str> {
	format!("{}|{}", target_id, typ).into()
}

#[async_trait]
impl meta_adapter::MetaAdapter for MetaAdapterMemory {
	async fn read_profile(&self, user_id: &str) -> FlResult<Option<Profile>> {
		Ok(self.inner.read().profiles.get(user_id).cloned())
	}

	async fn read_post_author(&self, post_id: &str) -> FlResult<Option<Box<str>>> {
		Ok(self.inner.read().post_authors.get(post_id).cloned())
	}

	async fn read_comment_author(&self, comment_id: &str) -> FlResult<Option<Box<str>>> {
		Ok(self.inner.read().comment_authors.get(comment_id).cloned())
	}

	async fn is_blocked(&self, user_a: &str, user_b: &str) -> FlResult<bool> {
		let inner = self.inner.read();
		Ok(inner.blocks.contains(&(user_a.into(), user_b.into()))
			|| inner.blocks.contains(&(user_b.into(), user_a.into())))
	}

	async fn create_notification(&self, notification: &Notification) -> FlResult<()> {
		self.inner.write().notifications.push(notification.clone());
		Ok(())
	}

	async fn list_notifications(
		&self,
		user_id: &str,
		opts: &ListNotificationsOptions,
	) -> FlResult<Vec<Notification>> {
		let inner = self.inner.read();
		let mut list: Vec<Notification> = inner
			.notifications
			.iter()
			.filter(|n| &*n.user_id == user_id)
			.filter(|n| !opts.unread_only || !n.is_read)
			.cloned()
			.collect();
		// Newest first
		list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
		if let Some(limit) = opts.limit {
			list.truncate(limit as usize);
		}
		Ok(list)
	}

	async fn mark_notification_read(&self, user_id: &str, notification_id: &str) -> FlResult<()> {
		let mut inner = self.inner.write();
		let notification = inner
			.notifications
			.iter_mut()
			.find(|n| &*n.notification_id == notification_id && &*n.user_id == user_id)
			.ok_or(Error::NotFound)?;
		notification.is_read = true;
		Ok(())
	}

	async fn delete_notifications(&self, notification_ids: &[Box<str>]) -> FlResult<u32> {
		let ids: BTreeSet<&str> = notification_ids.iter().map(AsRef::as_ref).collect();
		let mut inner = self.inner.write();
		let before = inner.notifications.len();
		inner.notifications.retain(|n| !ids.contains(&*n.notification_id));
		Ok(u32::try_from(before - inner.notifications.len()).unwrap_or(u32::MAX))
	}

	async fn append_security_event(&self, event: &SecurityEvent) -> FlResult<()> {
		self.inner.write().security_events.push(event.clone());
		Ok(())
	}

	async fn append_audit_entry(&self, entry: &AuditEntry) -> FlResult<()> {
		self.inner.write().audit_entries.push(entry.clone());
		Ok(())
	}

	async fn count_audit_entries(&self, kind: AuditKind) -> FlResult<u32> {
		let count = self.inner.read().audit_entries.iter().filter(|e| e.kind == kind).count();
		Ok(u32::try_from(count).unwrap_or(u32::MAX))
	}

	async fn read_stored_role(&self, user_id: &str) -> FlResult<Option<StoredRole>> {
		Ok(self.inner.read().stored_roles.get(user_id).cloned())
	}

	async fn update_stored_role(&self, user_id: &str, role: Option<&StoredRole>) -> FlResult<()> {
		let mut inner = self.inner.write();
		match role {
			Some(role) => {
				inner.stored_roles.insert(user_id.into(), role.clone());
			}
			None => {
				inner.stored_roles.remove(user_id);
			}
		}
		Ok(())
	}

	async fn load_rate_window(&self, key: &str) -> FlResult<(RateWindow, u64)> {
		let inner = self.inner.read();
		Ok(inner.rate_windows.get(key).cloned().unwrap_or((RateWindow::default(), 0)))
	}

	async fn store_rate_window(
		&self,
		key: &str,
		window: &RateWindow,
		expected_version: u64,
	) -> FlResult<bool> {
		let mut inner = self.inner.write();
		let current = inner.rate_windows.get(key).map_or(0, |(_, v)| *v);
		if current != expected_version {
			return Ok(false);
		}
		inner.rate_windows.insert(key.into(), (window.clone(), expected_version + 1));
		Ok(true)
	}

	async fn record_target_event(
		&self,
		target_id: &str,
		typ: &str,
		sender_id: &str,
		at: Timestamp,
	) -> FlResult<()> {
		let mut inner = self.inner.write();
		let events = inner.target_events.entry(target_key(target_id, typ)).or_default();
		events.push((sender_id.into(), at.0));
		Ok(())
	}

	async fn distinct_senders_since(
		&self,
		target_id: &str,
		typ: &str,
		since: Timestamp,
	) -> FlResult<u32> {
		let inner = self.inner.read();
		let Some(events) = inner.target_events.get(&target_key(target_id, typ)) else {
			return Ok(0);
		};
		let senders: BTreeSet<&str> = events
			.iter()
			.filter(|(_, at)| *at > since.0)
			.map(|(sender, _)| sender.as_ref())
			.collect();
		Ok(u32::try_from(senders.len()).unwrap_or(u32::MAX))
	}
}


// vim: ts=4
