//! Admin privilege guard and management endpoints.

pub mod grants;
pub mod handler;
pub mod perm;

pub use flock_core::guard;

mod prelude;

// vim: ts=4
