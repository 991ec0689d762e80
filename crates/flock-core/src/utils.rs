//! Utility functions

use rand::RngExt;
use std::time::Duration;

use crate::prelude::*;

pub const ID_LENGTH: usize = 24;
pub const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

pub fn random_id() -> String {
	let mut rng = rand::rng();
	let mut result = String::with_capacity(ID_LENGTH);

	for _ in 0..ID_LENGTH {
		result.push(SAFE[rng.random_range(0..SAFE.len())]);
	}
	result
}

/// Run a store operation with a bounded timeout.
///
/// A timeout surfaces as `Internal`; callers on the security path treat
/// that as denial (fail-closed), bookkeeping callers log and move on.
pub async fn bounded<T, F>(timeout_ms: u64, what: &str, fut: F) -> FlResult<T>
where
	F: std::future::Future<Output = FlResult<T>>,
{
	match tokio::time::timeout(Duration::from_millis(timeout_ms), fut).await {
		Ok(res) => res,
		Err(_) => {
			error!("{} timed out after {}ms", what, timeout_ms);
			Err(Error::Internal(format!("{} timed out", what)))
		}
	}
}


// vim: ts=4
