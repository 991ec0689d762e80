//! Core infrastructure for the Flock platform.
//!
//! Holds the shared application state and the abuse-guarding building
//! blocks invoked by the feature crates: the content sanitizer, the
//! sliding-window rate limiter, the privilege guard, and the
//! security-event recorder.

pub mod app;
pub mod audit;
pub mod config;
pub mod extract;
pub mod guard;
pub mod prelude;
pub mod rate_limit;
pub mod sanitize;
pub mod utils;

// vim: ts=4
