//! Rate Limiting System
//!
//! Sliding-window rate limiting with escalating lockout, evaluated per
//! subject key (actor, IP, target) plus multi-subject coordinated-attack
//! detection. Counters live behind the `CounterStore` trait: in-memory for
//! tests and single-instance deployments, document-store-backed with
//! optimistic concurrency for horizontal scaling.

mod limiter;
mod memory;
mod meta;
mod store;

pub use limiter::{RateLimiter, RateStatus, RateSubject};
pub use memory::MemoryCounterStore;
pub use meta::MetaCounterStore;
pub use store::{evaluate_window, CounterStore, WindowDecision};

// vim: ts=4
