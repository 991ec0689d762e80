//! Counter store abstraction and the shared window state machine.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;
use flock_types::meta_adapter::RateWindow;

/// Outcome of evaluating one window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowDecision {
	Allowed { remaining: u32 },
	Limited { retry_after_secs: u32 },
}

/// Storage backend for rate-window counters.
///
/// `check_and_record` must be atomic per key: two concurrent invocations
/// may not both observe the pre-increment count (lost-update race).
#[async_trait]
pub trait CounterStore: Debug + Send + Sync {
	/// Prune stale events, evaluate the limit, and record the current
	/// event when allowed. Transitions into lockout happen here.
	async fn check_and_record(
		&self,
		key: &str,
		now: Timestamp,
		window_secs: i64,
		limit: u32,
		lockout_secs: i64,
	) -> FlResult<WindowDecision>;

	/// Record one event against a (target, type) pair for distinct-sender
	/// queries.
	async fn record_target_event(
		&self,
		target_id: &str,
		typ: &str,
		sender_id: &str,
		at: Timestamp,
	) -> FlResult<()>;

	/// Number of distinct senders that hit (target, type) since `since`.
	async fn distinct_senders_since(
		&self,
		target_id: &str,
		typ: &str,
		since: Timestamp,
	) -> FlResult<u32>;
}

/// The per-window state machine: Open -> AtLimit -> Blocked -> Open.
///
/// Stale events are pruned before comparison, so a fixed-window boundary
/// burst cannot double the effective limit. Hitting the limit sets
/// `blocked_until = now + lockout_secs`; until then every call is denied
/// with the remaining block time.
pub fn evaluate_window(
	window: &mut RateWindow,
	now: Timestamp,
	window_secs: i64,
	limit: u32,
	lockout_secs: i64,
) -> WindowDecision {
	if let Some(blocked_until) = window.blocked_until {
		if now < blocked_until {
			let retry = u32::try_from(blocked_until.since(now)).unwrap_or(u32::MAX);
			return WindowDecision::Limited { retry_after_secs: retry.max(1) };
		}
		window.blocked_until = None;
	}

	window.prune(now, window_secs);

	let count = u32::try_from(window.events.len()).unwrap_or(u32::MAX);
	if count < limit {
		window.events.push(now.0);
		WindowDecision::Allowed { remaining: limit - count - 1 }
	} else {
		window.blocked_until = Some(now.plus_secs(lockout_secs));
		WindowDecision::Limited {
			retry_after_secs: u32::try_from(lockout_secs).unwrap_or(u32::MAX).max(1),
		}
	}
}


// vim: ts=4
