//! Shared types, adapter traits, and core utilities for the Flock platform.
//!
//! This crate contains the foundational types shared between the server
//! crate, the feature crates, and all adapter implementations: the error
//! taxonomy, the notification data model, the security/audit records, and
//! the traits abstracting the document store and the identity provider.

pub mod error;
pub mod identity_adapter;
pub mod meta_adapter;
pub mod notification;
pub mod prelude;
pub mod security;
pub mod types;

// vim: ts=4
