//! Security-event recording.
//!
//! Writes are fire-and-forget relative to the primary decision: a failed
//! append is logged locally and never fails the request that triggered it.

use std::sync::Arc;

use crate::prelude::*;
use flock_types::meta_adapter::MetaAdapter;
use flock_types::security::{SecurityEvent, SecurityEventKind};

#[derive(Clone, Debug)]
pub struct SecurityLog {
	meta: Arc<dyn MetaAdapter>,
}

impl SecurityLog {
	pub fn new(meta: Arc<dyn MetaAdapter>) -> Self {
		Self { meta }
	}

	/// Append a security event. Failures are logged, not propagated.
	pub async fn record(&self, event: SecurityEvent) {
		let kind = event.kind;
		if let Err(e) = self.meta.append_security_event(&event).await {
			warn!(kind = kind.as_str(), actor = %event.actor_id, "Failed to write security event: {}", e);
		} else {
			debug!(kind = kind.as_str(), actor = %event.actor_id, "Security event recorded");
		}
	}

	/// Convenience wrapper building the event in place.
	pub async fn report(&self, kind: SecurityEventKind, actor_id: &str, detail: serde_json::Value) {
		self.record(SecurityEvent::new(kind, actor_id, detail)).await;
	}
}

// vim: ts=4
