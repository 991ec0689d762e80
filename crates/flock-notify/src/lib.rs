//! Notification pipeline: the guarded create/read/delete surface.

pub mod handler;
pub mod perm;

mod prelude;

// vim: ts=4
