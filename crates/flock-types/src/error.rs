//! Error taxonomy shared by every Flock crate.
//!
//! Expected outcomes (validation, permission, rate-limit failures) are
//! ordinary `Error` values the caller branches on. Infrastructure failures
//! are logged with full context at the point of failure and surfaced as
//! `Internal`, which never leaks detail to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type FlResult<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug)]
pub enum Error {
	/// No verified actor identity present
	Unauthenticated,
	/// Malformed, missing, or out-of-range input
	InvalidArgument(String),
	/// Referenced actor, target, or resource does not exist
	NotFound,
	/// Block relationship, ownership mismatch, or insufficient authority
	PermissionDenied,
	/// A rate or coordinated-attack limit triggered
	ResourceExhausted {
		reason: Box<str>,
		retry_after_secs: u32,
	},
	/// Duplicate state
	AlreadyExists,
	/// Operation requires a system state that does not hold
	FailedPrecondition(String),
	/// Unexpected infrastructure failure; detail stays server-side
	Internal(String),
}

impl Error {
	/// Stable machine-readable code for callers to branch on.
	pub fn code(&self) -> &'static str {
		match self {
			Error::Unauthenticated => "E-UNAUTHENTICATED",
			Error::InvalidArgument(_) => "E-INVALID-ARGUMENT",
			Error::NotFound => "E-NOT-FOUND",
			Error::PermissionDenied => "E-PERMISSION-DENIED",
			Error::ResourceExhausted { .. } => "E-RATE-LIMITED",
			Error::AlreadyExists => "E-ALREADY-EXISTS",
			Error::FailedPrecondition(_) => "E-PRECONDITION",
			Error::Internal(_) => "E-INTERNAL",
		}
	}

	fn status(&self) -> StatusCode {
		match self {
			Error::Unauthenticated => StatusCode::UNAUTHORIZED,
			Error::InvalidArgument(_) => StatusCode::BAD_REQUEST,
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			Error::ResourceExhausted { .. } => StatusCode::TOO_MANY_REQUESTS,
			Error::AlreadyExists => StatusCode::CONFLICT,
			Error::FailedPrecondition(_) => StatusCode::PRECONDITION_FAILED,
			Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::Unauthenticated => write!(f, "unauthenticated"),
			Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ResourceExhausted { reason, retry_after_secs } => {
				write!(f, "rate limited ({}), retry after {}s", reason, retry_after_secs)
			}
			Error::AlreadyExists => write!(f, "already exists"),
			Error::FailedPrecondition(msg) => write!(f, "failed precondition: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status();
		let code = self.code();

		let message = match &self {
			Error::Unauthenticated => "Authentication required".to_string(),
			Error::InvalidArgument(msg) => msg.clone(),
			Error::NotFound => "Resource not found".to_string(),
			Error::PermissionDenied => "Permission denied".to_string(),
			Error::ResourceExhausted { .. } => "Too many requests. Please slow down.".to_string(),
			Error::AlreadyExists => "Resource already exists".to_string(),
			Error::FailedPrecondition(msg) => msg.clone(),
			// Opaque on the wire; the original detail was already logged
			Error::Internal(_) => "Internal server error".to_string(),
		};

		let body = match &self {
			Error::ResourceExhausted { reason, retry_after_secs } => serde_json::json!({
				"error": {
					"code": code,
					"message": message,
					"details": {
						"reason": reason,
						"retryAfter": retry_after_secs
					}
				}
			}),
			_ => serde_json::json!({
				"error": {
					"code": code,
					"message": message
				}
			}),
		};

		let mut response = (status, Json(body)).into_response();

		if let Error::ResourceExhausted { retry_after_secs, .. } = self {
			if let Ok(val) = retry_after_secs.to_string().parse() {
				response.headers_mut().insert("Retry-After", val);
			}
		}

		response
	}
}


// vim: ts=4
