//! Flock server library: wires the guard pipeline crates into an axum app.
//!
//! The binary in `main.rs` runs this with the in-memory adapters; the
//! integration tests drive the same router directly through tower.

pub mod config;
pub mod middleware;
pub mod routes;

mod prelude;

use std::sync::Arc;

use flock_core::app::{App, AppState};
use flock_core::rate_limit::{CounterStore, MemoryCounterStore, MetaCounterStore};
use flock_identity_adapter_memory::IdentityAdapterMemory;
use flock_meta_adapter_memory::MetaAdapterMemory;
use flock_types::meta_adapter::MetaAdapter;

pub use config::ServerConfig;

/// Build the default in-memory deployment. The adapters are returned
/// alongside the app so callers can seed fixtures and issue tokens.
pub fn build_memory_app(config: ServerConfig) -> (App, Arc<MetaAdapterMemory>, Arc<IdentityAdapterMemory>) {
	let meta = Arc::new(MetaAdapterMemory::new());
	let identity = Arc::new(IdentityAdapterMemory::new(&config.token_secret));

	let meta_adapter: Arc<dyn MetaAdapter> = meta.clone();
	let counter_store: Arc<dyn CounterStore> = if config.shared_counters {
		Arc::new(MetaCounterStore::new(Arc::clone(&meta_adapter)))
	} else {
		Arc::new(MemoryCounterStore::default())
	};
	let app = AppState::new(config.guard, meta_adapter, identity.clone(), counter_store);
	(app, meta, identity)
}

// vim: ts=4
