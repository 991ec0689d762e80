//! Guard pipeline configuration.
//!
//! Every policy constant of the guarding pipeline lives here. The defaults
//! mirror production values but none of them is validated against real
//! abuse data; deployments tune them via configuration, not code.

use serde::Deserialize;

/// Rate limit policy for one evaluation dimension.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowPolicy {
	/// Events allowed inside one sliding window
	pub limit: u32,
	/// Sliding window size in seconds
	pub window_secs: i64,
}

impl WindowPolicy {
	pub const fn new(limit: u32, window_secs: i64) -> Self {
		Self { limit, window_secs }
	}
}

impl Default for WindowPolicy {
	fn default() -> Self {
		Self::new(10, 60)
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RateLimitConfig {
	/// Per-actor limit, applied per notification type
	pub actor: WindowPolicy,
	/// Accounts younger than this get a reduced actor limit
	pub new_account_age_secs: i64,
	/// Divisor applied to the actor limit for new accounts
	pub new_account_divisor: u32,
	/// Per-IP limit; coarser, higher ceiling
	pub ip: WindowPolicy,
	/// Per-target incoming-notification protection (hourly)
	pub target: WindowPolicy,
	/// Ceiling multiplier for verified / high-follower targets
	pub protected_target_multiplier: u32,
	/// Follower count at which a target counts as high-follower
	pub high_follower_threshold: u32,
	/// Distinct senders per (target, type) that flag a coordinated attack
	pub coordinated_threshold: u32,
	/// Short window for coordinated-attack detection, in seconds
	pub coordinated_window_secs: i64,
	/// Lockout duration = multiplier x window size
	pub lockout_multiplier: i64,
	/// Bounded timeout for counter-store reads/writes, in milliseconds
	pub store_timeout_ms: u64,
}

impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			actor: WindowPolicy::new(10, 60),
			new_account_age_secs: 86_400,
			new_account_divisor: 2,
			ip: WindowPolicy::new(100, 60),
			target: WindowPolicy::new(50, 3600),
			protected_target_multiplier: 2,
			high_follower_threshold: 10_000,
			coordinated_threshold: 3,
			coordinated_window_secs: 60,
			lockout_multiplier: 2,
			store_timeout_ms: 2000,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GuardConfig {
	pub rate_limit: RateLimitConfig,
	/// Upper bound on bulk admin operations (system notification targets,
	/// deletions) per call
	pub bulk_limit: usize,
	/// Shared secret gating `createInitialSuperAdmin` in production
	pub setup_key: Option<Box<str>>,
	/// Trust forwarding headers for the client IP. Only enable when the
	/// deployment sits behind a reverse proxy that overwrites them;
	/// otherwise the peer address is used and the headers are ignored.
	pub behind_proxy: bool,
}

impl Default for GuardConfig {
	fn default() -> Self {
		Self {
			rate_limit: RateLimitConfig::default(),
			bulk_limit: 100,
			setup_key: None,
			behind_proxy: false,
		}
	}
}

// vim: ts=4
