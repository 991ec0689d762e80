//! Common types used throughout the Flock platform.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

// Timestamp //
//***********//
/// Unix timestamp in seconds. The document store assigns these on write;
/// everything in-process uses the same representation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	/// Seconds elapsed since `earlier` (zero if `earlier` is in the future)
	pub fn since(self, earlier: Timestamp) -> i64 {
		(self.0 - earlier.0).max(0)
	}

	pub fn plus_secs(self, secs: i64) -> Timestamp {
		Timestamp(self.0.saturating_add(secs))
	}

	pub fn minus_secs(self, secs: i64) -> Timestamp {
		Timestamp(self.0.saturating_sub(secs))
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

// ApiResponse //
//*************//
/// Standard success envelope for API responses.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
	pub data: T,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { data }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_since_clamps_to_zero() {
		let a = Timestamp(100);
		let b = Timestamp(200);
		assert_eq!(b.since(a), 100);
		assert_eq!(a.since(b), 0);
	}

	#[test]
	fn test_arithmetic() {
		let t = Timestamp(1000);
		assert_eq!(t.plus_secs(60), Timestamp(1060));
		assert_eq!(t.minus_secs(60), Timestamp(940));
	}
}

// vim: ts=4
