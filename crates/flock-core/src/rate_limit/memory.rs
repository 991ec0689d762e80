//! In-memory counter store.
//!
//! Best-effort: counters are local to one process, so two instances will
//! not see each other's increments. Suitable for tests and single-instance
//! deployments; multi-instance deployments use `MetaCounterStore`.

use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

use super::store::{evaluate_window, CounterStore, WindowDecision};
use crate::prelude::*;
use flock_types::meta_adapter::RateWindow;

/// Target events older than this are dropped on every touch. The longest
/// per-target policy window is one hour.
const TARGET_EVENT_RETENTION_SECS: i64 = 3600;

// SAFETY: 100_000 is non-zero
const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(100_000) {
	Some(v) => v,
	None => unreachable!(),
};

#[derive(Debug)]
pub struct MemoryCounterStore {
	windows: Mutex<LruCache<Box<str>, RateWindow>>,
	target_events: Mutex<LruCache<Box<str>, Vec<(Box<str>, i64)>>>,
}

impl MemoryCounterStore {
	pub fn new(max_tracked_subjects: usize) -> Self {
		let cap = NonZeroUsize::new(max_tracked_subjects).unwrap_or(DEFAULT_CAPACITY);
		Self {
			windows: Mutex::new(LruCache::new(cap)),
			target_events: Mutex::new(LruCache::new(cap)),
		}
	}
}

impl Default for MemoryCounterStore {
	fn default() -> Self {
		Self::new(DEFAULT_CAPACITY.get())
	}
}

fn target_key(target_id: &str, typ: &str) -> Box<str> {
	format!("{}|{}", target_id, typ).into()
}

#[async_trait]
impl CounterStore for MemoryCounterStore {
	async fn check_and_record(
		&self,
		key: &str,
		now: Timestamp,
		window_secs: i64,
		limit: u32,
		lockout_secs: i64,
	) -> FlResult<WindowDecision> {
		let mut windows = self.windows.lock();
		let window = windows.get_or_insert_mut(Box::from(key), RateWindow::default);
		Ok(evaluate_window(window, now, window_secs, limit, lockout_secs))
	}

	async fn record_target_event(
		&self,
		target_id: &str,
		typ: &str,
		sender_id: &str,
		at: Timestamp,
	) -> FlResult<()> {
		let mut map = self.target_events.lock();
		let events = map.get_or_insert_mut(target_key(target_id, typ), Vec::new);
		let cutoff = at.0 - TARGET_EVENT_RETENTION_SECS;
		events.retain(|(_, t)| *t > cutoff);
		events.push((sender_id.into(), at.0));
		Ok(())
	}

	async fn distinct_senders_since(
		&self,
		target_id: &str,
		typ: &str,
		since: Timestamp,
	) -> FlResult<u32> {
		let mut map = self.target_events.lock();
		let Some(events) = map.get(&target_key(target_id, typ)) else {
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

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_check_and_record_independent_keys() {
		let store = MemoryCounterStore::new(16);
		for _ in 0..3 {
			let decision =
				store.check_and_record("actor:like:alice", Timestamp(100), 60, 3, 120).await.unwrap();
			assert!(matches!(decision, WindowDecision::Allowed { .. }));
		}
		let decision =
			store.check_and_record("actor:like:alice", Timestamp(100), 60, 3, 120).await.unwrap();
		assert!(matches!(decision, WindowDecision::Limited { .. }));

		// A different subject is unaffected
		let decision =
			store.check_and_record("actor:like:bob", Timestamp(100), 60, 3, 120).await.unwrap();
		assert!(matches!(decision, WindowDecision::Allowed { .. }));
	}

	#[tokio::test]
	async fn test_distinct_senders() {
		let store = MemoryCounterStore::new(16);
		store.record_target_event("carol", "like", "a", Timestamp(100)).await.unwrap();
		store.record_target_event("carol", "like", "b", Timestamp(101)).await.unwrap();
		store.record_target_event("carol", "like", "a", Timestamp(102)).await.unwrap();

		assert_eq!(store.distinct_senders_since("carol", "like", Timestamp(50)).await.unwrap(), 2);
		// Events of other types do not count
		assert_eq!(store.distinct_senders_since("carol", "reply", Timestamp(50)).await.unwrap(), 0);
		// Out-of-window events do not count
		assert_eq!(store.distinct_senders_since("carol", "like", Timestamp(101)).await.unwrap(), 1);
	}
}

// vim: ts=4
