//! App state type

use std::sync::Arc;

use crate::audit::SecurityLog;
use crate::config::GuardConfig;
use crate::rate_limit::{CounterStore, RateLimiter};

use flock_types::identity_adapter::IdentityAdapter;
use flock_types::meta_adapter::MetaAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct AppState {
	pub config: GuardConfig,

	pub meta_adapter: Arc<dyn MetaAdapter>,
	pub identity_adapter: Arc<dyn IdentityAdapter>,

	pub rate_limiter: RateLimiter,
	pub security: SecurityLog,
}

pub type App = Arc<AppState>;

impl AppState {
	pub fn new(
		config: GuardConfig,
		meta_adapter: Arc<dyn MetaAdapter>,
		identity_adapter: Arc<dyn IdentityAdapter>,
		counter_store: Arc<dyn CounterStore>,
	) -> App {
		let rate_limiter = RateLimiter::new(config.rate_limit.clone(), counter_store);
		let security = SecurityLog::new(Arc::clone(&meta_adapter));

		Arc::new(AppState { config, meta_adapter, identity_adapter, rate_limiter, security })
	}
}

// vim: ts=4
