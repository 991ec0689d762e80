//! Document-store-backed counter store.
//!
//! Windows are kept in the document store behind a versioned
//! read-modify-write: the whole window document is loaded, evaluated
//! locally, and written back only if the stored version did not move. A
//! conflict means another instance raced us on the same key, so the
//! evaluation is retried on fresh state. Retry exhaustion is an error,
//! which the limiter treats as denial.

use async_trait::async_trait;
use std::sync::Arc;

use super::store::{evaluate_window, CounterStore, WindowDecision};
use crate::prelude::*;
use flock_types::meta_adapter::MetaAdapter;

const MAX_RETRIES: u32 = 3;

#[derive(Clone, Debug)]
pub struct MetaCounterStore {
	meta: Arc<dyn MetaAdapter>,
}

impl MetaCounterStore {
	pub fn new(meta: Arc<dyn MetaAdapter>) -> Self {
		Self { meta }
	}
}

#[async_trait]
impl CounterStore for MetaCounterStore {
	async fn check_and_record(
		&self,
		key: &str,
		now: Timestamp,
		window_secs: i64,
		limit: u32,
		lockout_secs: i64,
	) -> FlResult<WindowDecision> {
		for attempt in 0..MAX_RETRIES {
			let (mut window, version) = self.meta.load_rate_window(key).await?;
			let decision = evaluate_window(&mut window, now, window_secs, limit, lockout_secs);
			if self.meta.store_rate_window(key, &window, version).await? {
				return Ok(decision);
			}
			debug!(key, attempt, "Rate window version conflict, retrying");
		}
		Err(Error::Internal(format!("rate window contention on key '{}'", key)))
	}

	async fn record_target_event(
		&self,
		target_id: &str,
		typ: &str,
		sender_id: &str,
		at: Timestamp,
	) -> FlResult<()> {
		self.meta.record_target_event(target_id, typ, sender_id, at).await
	}

	async fn distinct_senders_since(
		&self,
		target_id: &str,
		typ: &str,
		since: Timestamp,
	) -> FlResult<u32> {
		self.meta.distinct_senders_since(target_id, typ, since).await
	}
}

// vim: ts=4
