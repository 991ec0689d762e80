//! The rate limiter proper: four policies evaluated in sequence.
//!
//! Order matters: the cheap per-subject windows (actor, IP, target) run
//! before the coordinated-attack query, and the first denial wins. Every
//! store interaction is bounded by `store_timeout_ms`; a store failure or
//! timeout on this path denies the request rather than letting it through
//! uncounted.

use std::sync::Arc;

use super::store::{CounterStore, WindowDecision};
use crate::audit::SecurityLog;
use crate::config::{RateLimitConfig, WindowPolicy};
use crate::prelude::*;
use crate::utils::bounded;
use flock_types::notification::NotificationType;
use flock_types::security::SecurityEventKind;

/// Everything the limiter needs to know about one notification attempt.
#[derive(Clone, Copy, Debug)]
pub struct RateSubject<'a> {
	pub actor_id: &'a str,
	pub actor_created_at: Timestamp,
	pub client_ip: Option<&'a str>,
	pub target_id: &'a str,
	pub target_verified: bool,
	pub target_follower_count: u32,
	pub typ: NotificationType,
}

/// Returned on an allowed request; `remaining` is the tightest headroom
/// across the windows that were consulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateStatus {
	pub remaining: u32,
}

#[derive(Clone, Debug)]
pub struct RateLimiter {
	config: RateLimitConfig,
	store: Arc<dyn CounterStore>,
}

impl RateLimiter {
	pub fn new(config: RateLimitConfig, store: Arc<dyn CounterStore>) -> Self {
		Self { config, store }
	}

	/// Evaluate all policies for one attempt at the current time.
	pub async fn check(
		&self,
		subject: &RateSubject<'_>,
		security: &SecurityLog,
	) -> FlResult<RateStatus> {
		self.check_at(subject, security, Timestamp::now()).await
	}

	pub async fn check_at(
		&self,
		subject: &RateSubject<'_>,
		security: &SecurityLog,
		now: Timestamp,
	) -> FlResult<RateStatus> {
		let cfg = &self.config;
		let mut remaining = u32::MAX;

		// 1. Per-actor window, keyed per notification type. Accounts younger
		// than newAccountAgeSecs get a reduced limit.
		let mut actor_policy = cfg.actor;
		if now.since(subject.actor_created_at) < cfg.new_account_age_secs {
			actor_policy.limit = (actor_policy.limit / cfg.new_account_divisor).max(1);
		}
		let key = format!("actor:{}:{}", subject.typ.as_str(), subject.actor_id);
		match self.window(&key, now, actor_policy).await? {
			WindowDecision::Allowed { remaining: r } => remaining = remaining.min(r),
			WindowDecision::Limited { retry_after_secs } => {
				info!(actor = subject.actor_id, typ = subject.typ.as_str(), "Actor rate limit hit");
				return Err(Error::ResourceExhausted {
					reason: "actor".into(),
					retry_after_secs,
				});
			}
		}

		// 2. Per-IP window, across all actors behind that address.
		if let Some(ip) = subject.client_ip {
			let key = format!("ip:{}", ip);
			match self.window(&key, now, cfg.ip).await? {
				WindowDecision::Allowed { remaining: r } => remaining = remaining.min(r),
				WindowDecision::Limited { retry_after_secs } => {
					security
						.report(
							SecurityEventKind::IpRateLimitExceeded,
							subject.actor_id,
							serde_json::json!({ "ip": ip, "type": subject.typ.as_str() }),
						)
						.await;
					return Err(Error::ResourceExhausted {
						reason: "ip".into(),
						retry_after_secs,
					});
				}
			}
		}

		// 3. Per-target incoming flood protection. Verified and high-follower
		// accounts attract legitimate bursts, so their ceiling is raised.
		let mut target_policy = cfg.target;
		if subject.target_verified || subject.target_follower_count >= cfg.high_follower_threshold {
			target_policy.limit = target_policy.limit.saturating_mul(cfg.protected_target_multiplier);
		}
		let key = format!("target:{}", subject.target_id);
		match self.window(&key, now, target_policy).await? {
			WindowDecision::Allowed { remaining: r } => remaining = remaining.min(r),
			WindowDecision::Limited { retry_after_secs } => {
				security
					.report(
						SecurityEventKind::TargetFlood,
						subject.actor_id,
						serde_json::json!({
							"target": subject.target_id,
							"type": subject.typ.as_str(),
						}),
					)
					.await;
				return Err(Error::ResourceExhausted {
					reason: "target".into(),
					retry_after_secs,
				});
			}
		}

		// 4. Coordinated-attack detection: many distinct senders hitting the
		// same (target, type) inside a short window. The current attempt is
		// recorded first so the sender that crosses the threshold is denied.
		let typ = subject.typ.as_str();
		bounded(
			cfg.store_timeout_ms,
			"target event record",
			self.store.record_target_event(subject.target_id, typ, subject.actor_id, now),
		)
		.await?;
		let since = now.minus_secs(cfg.coordinated_window_secs);
		let senders = bounded(
			cfg.store_timeout_ms,
			"distinct sender query",
			self.store.distinct_senders_since(subject.target_id, typ, since),
		)
		.await?;
		if senders >= cfg.coordinated_threshold {
			security
				.report(
					SecurityEventKind::CoordinatedAttack,
					subject.actor_id,
					serde_json::json!({
						"target": subject.target_id,
						"type": typ,
						"distinctSenders": senders,
					}),
				)
				.await;
			warn!(
				target = subject.target_id,
				typ, senders, "Coordinated attack pattern detected"
			);
			return Err(Error::ResourceExhausted {
				reason: "coordinated".into(),
				retry_after_secs: u32::try_from(cfg.coordinated_window_secs).unwrap_or(u32::MAX),
			});
		}

		Ok(RateStatus { remaining })
	}

	async fn window(
		&self,
		key: &str,
		now: Timestamp,
		policy: WindowPolicy,
	) -> FlResult<WindowDecision> {
		let lockout = policy.window_secs.saturating_mul(self.config.lockout_multiplier);
		bounded(
			self.config.store_timeout_ms,
			"rate window check",
			self.store.check_and_record(key, now, policy.window_secs, policy.limit, lockout),
		)
		.await
	}
}


// vim: ts=4
