//! Server configuration from the environment.

use std::env;

use flock_core::config::GuardConfig;

#[derive(Clone, Debug)]
pub struct ServerConfig {
	pub listen: Box<str>,
	/// HS256 secret for bearer tokens
	pub token_secret: Box<str>,
	/// Store counters in the document store instead of process memory, so
	/// multiple instances share rate-limit state
	pub shared_counters: bool,
	pub guard: GuardConfig,
}

impl ServerConfig {
	/// Read configuration from `FLOCK_*` environment variables, falling
	/// back to development defaults.
	pub fn from_env() -> Self {
		let guard = GuardConfig {
			setup_key: env::var("FLOCK_SETUP_KEY").ok().map(Into::into),
			behind_proxy: env::var("FLOCK_BEHIND_PROXY").is_ok_and(|v| v == "1"),
			..GuardConfig::default()
		};

		Self {
			listen: env::var("FLOCK_LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".into()).into(),
			token_secret: env::var("FLOCK_TOKEN_SECRET")
				.unwrap_or_else(|_| "flock-dev-secret".into())
				.into(),
			shared_counters: env::var("FLOCK_SHARED_COUNTERS").is_ok_and(|v| v == "1"),
			guard,
		}
	}
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self {
			listen: "127.0.0.1:8080".into(),
			token_secret: "flock-dev-secret".into(),
			shared_counters: false,
			guard: GuardConfig::default(),
		}
	}
}

// vim: ts=4
