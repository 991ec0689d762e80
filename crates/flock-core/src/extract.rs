//! Custom Axum extractors for Flock-specific types.
//!
//! The auth middleware verifies the bearer token and inserts an `AuthCtx`
//! into the request extensions; handlers pull it out through `Auth`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use flock_types::error::Error;
use flock_types::identity_adapter::AuthCtx;

/// Authenticated context extracted from request extensions (set by the
/// auth middleware).
#[derive(Clone, Debug)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth_ctx) = parts.extensions.get::<AuthCtx>().cloned() {
			Ok(Auth(auth_ctx))
		} else {
			Err(Error::Unauthenticated)
		}
	}
}

/// Client IP extracted from request extensions (set by the auth middleware
/// from the connection info / forwarding headers).
#[derive(Clone, Debug)]
pub struct ClientIp(pub Option<Box<str>>);

impl<S> FromRequestParts<S> for ClientIp
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(parts.extensions.get::<ClientIp>().cloned().unwrap_or(ClientIp(None)))
	}
}

// vim: ts=4
